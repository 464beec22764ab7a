//! Client-local daily usage counter.
//!
//! Lives only on the user's machine, so it throttles accidental overuse and
//! nothing more.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounter {
    pub count: u32,
    /// Local calendar date the count belongs to, `YYYY-MM-DD`.
    pub date_stamp: String,
}

impl UsageCounter {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            count: 0,
            date_stamp: date_stamp(today),
        }
    }
}

pub fn date_stamp(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Today's date in the local time zone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Error)]
pub enum UsageStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed usage record: {0}")]
    Format(#[from] serde_json::Error),
}

/// Persistence for the single usage record.
pub trait UsageStore {
    fn load(&self) -> Result<Option<UsageCounter>, UsageStoreError>;
    fn save(&mut self, counter: &UsageCounter) -> Result<(), UsageStoreError>;
}

/// Keeps the record as a JSON file.
#[derive(Debug, Clone)]
pub struct FileUsageStore {
    path: PathBuf,
}

impl FileUsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageStore for FileUsageStore {
    fn load(&self) -> Result<Option<UsageCounter>, UsageStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, counter: &UsageCounter) -> Result<(), UsageStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(counter)?)?;
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryUsageStore {
    pub record: Option<UsageCounter>,
}

impl UsageStore for MemoryUsageStore {
    fn load(&self) -> Result<Option<UsageCounter>, UsageStoreError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, counter: &UsageCounter) -> Result<(), UsageStoreError> {
        self.record = Some(counter.clone());
        Ok(())
    }
}

/// The usage counter plus its store and daily limit.
pub struct UsageTracker<S> {
    store: S,
    counter: UsageCounter,
    daily_limit: u32,
}

impl<S: UsageStore> UsageTracker<S> {
    /// Reads the stored record and resets it if it belongs to another day.
    /// A missing or unreadable record starts fresh.
    pub fn load(store: S, daily_limit: u32, today: NaiveDate) -> Self {
        let counter = match store.load() {
            Ok(Some(counter)) => counter,
            Ok(None) => UsageCounter::fresh(today),
            Err(e) => {
                warn!("Ignoring unreadable usage record: {e}");
                UsageCounter::fresh(today)
            }
        };
        let mut tracker = Self {
            store,
            counter,
            daily_limit,
        };
        tracker.reset_if_new_day(today);
        tracker
    }

    /// Zeroes the count when the stored date is not `today`.
    pub fn reset_if_new_day(&mut self, today: NaiveDate) -> bool {
        let stamp = date_stamp(today);
        if self.counter.date_stamp == stamp {
            return false;
        }
        debug!(
            "Usage counter reset ({} -> {})",
            self.counter.date_stamp, stamp
        );
        self.counter = UsageCounter {
            count: 0,
            date_stamp: stamp,
        };
        self.persist();
        true
    }

    /// Records one successful generation.
    pub fn increment(&mut self, today: NaiveDate) {
        self.reset_if_new_day(today);
        self.counter.count = self.counter.count.saturating_add(1);
        self.persist();
    }

    pub fn is_exhausted(&self) -> bool {
        self.counter.count >= self.daily_limit
    }

    pub fn remaining(&self) -> u32 {
        self.daily_limit.saturating_sub(self.counter.count)
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    pub fn counter(&self) -> &UsageCounter {
        &self.counter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.counter) {
            warn!("Failed to save usage record: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored(count: u32, stamp: &str) -> MemoryUsageStore {
        MemoryUsageStore {
            record: Some(UsageCounter {
                count,
                date_stamp: stamp.to_string(),
            }),
        }
    }

    #[test]
    fn test_new_day_resets_count() {
        let tracker = UsageTracker::load(stored(3, "2025-03-01"), 5, day(2025, 3, 2));
        assert_eq!(
            tracker.counter(),
            &UsageCounter {
                count: 0,
                date_stamp: "2025-03-02".to_string()
            }
        );
        // The reset is persisted, not just held in memory
        assert_eq!(tracker.store().record.as_ref().unwrap().count, 0);
    }

    #[test]
    fn test_same_day_preserves_count() {
        let tracker = UsageTracker::load(stored(3, "2025-03-01"), 5, day(2025, 3, 1));
        assert_eq!(tracker.counter().count, 3);
        assert_eq!(tracker.remaining(), 2);
        assert!(!tracker.is_exhausted());
    }

    #[test]
    fn test_exhausted_at_limit() {
        let tracker = UsageTracker::load(stored(5, "2025-03-01"), 5, day(2025, 3, 1));
        assert!(tracker.is_exhausted());
        assert_eq!(tracker.remaining(), 0);
    }

    #[test]
    fn test_missing_record_starts_fresh() {
        let tracker = UsageTracker::load(MemoryUsageStore::default(), 5, day(2025, 3, 1));
        assert_eq!(tracker.counter(), &UsageCounter::fresh(day(2025, 3, 1)));
    }

    #[test]
    fn test_increment_persists() {
        let mut tracker = UsageTracker::load(stored(1, "2025-03-01"), 5, day(2025, 3, 1));
        tracker.increment(day(2025, 3, 1));
        assert_eq!(tracker.counter().count, 2);
        assert_eq!(tracker.store().record.as_ref().unwrap().count, 2);
    }

    #[test]
    fn test_increment_across_midnight_starts_new_day() {
        let mut tracker = UsageTracker::load(stored(4, "2025-03-01"), 5, day(2025, 3, 1));
        tracker.increment(day(2025, 3, 2));
        assert_eq!(
            tracker.counter(),
            &UsageCounter {
                count: 1,
                date_stamp: "2025-03-02".to_string()
            }
        );
    }

    #[test]
    fn test_file_store_round_trip_and_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("usage.json");

        let mut tracker = UsageTracker::load(FileUsageStore::new(&path), 3, day(2025, 3, 1));
        tracker.increment(day(2025, 3, 1));

        let reloaded = UsageTracker::load(FileUsageStore::new(&path), 3, day(2025, 3, 1));
        assert_eq!(reloaded.counter().count, 1);

        std::fs::write(&path, "not json").unwrap();
        let recovered = UsageTracker::load(FileUsageStore::new(&path), 3, day(2025, 3, 1));
        assert_eq!(recovered.counter().count, 0);
    }
}

//! Form controller — the client half of a generation round trip.
//!
//! Holds the description, the last result or error, the loading flag and
//! the usage tracker. Rendering is left to the caller.

use std::io;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::client::api::{ClientError, GenerationApi};
use crate::client::clipboard::{Clipboard, CopyFeedback};
use crate::client::usage::{UsageStore, UsageTracker};
use crate::models::GenerationResult;

pub const EMPTY_INPUT_MESSAGE: &str = "Please paste a job description first";

pub fn quota_message(daily_limit: u32) -> String {
    format!(
        "You've used all {daily_limit} free proposals for today. \
         Come back tomorrow or upgrade for unlimited proposals."
    )
}

/// What a submit attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Generated,
    /// Blank description; no request was made.
    EmptyInput,
    /// Daily quota used up; no request was made.
    QuotaExhausted,
    /// A request is already outstanding.
    Busy,
    Failed,
}

/// An accepted submission whose request is outstanding.
#[must_use]
#[derive(Debug)]
pub struct Submission {
    description: String,
}

impl Submission {
    /// The description snapshot to send.
    pub fn description(&self) -> &str {
        &self.description
    }
}

pub struct FormController<A, S> {
    api: A,
    usage: UsageTracker<S>,
    description: String,
    proposal: Option<String>,
    special_instructions: Vec<String>,
    loading: bool,
    error: Option<String>,
    copy_feedback: CopyFeedback,
}

impl<A: GenerationApi, S: UsageStore> FormController<A, S> {
    pub fn new(api: A, usage: UsageTracker<S>) -> Self {
        Self {
            api,
            usage,
            description: String::new(),
            proposal: None,
            special_instructions: Vec::new(),
            loading: false,
            error: None,
            copy_feedback: CopyFeedback::default(),
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.description.trim().is_empty() && !self.usage.is_exhausted()
    }

    /// Runs one generation round trip.
    pub async fn submit(&mut self, today: NaiveDate) -> SubmitOutcome {
        let submission = match self.start(today) {
            Ok(submission) => submission,
            Err(outcome) => return outcome,
        };
        let result = self.api.generate(&submission.description).await;
        self.complete(submission, result, today)
    }

    /// First half of [`submit`](Self::submit), for callers that drive the
    /// request themselves and render while it is outstanding.
    ///
    /// Clears the previous result and error and raises the loading flag.
    /// Until the returned [`Submission`] is completed, further starts are
    /// refused with [`SubmitOutcome::Busy`].
    pub fn start(&mut self, today: NaiveDate) -> Result<Submission, SubmitOutcome> {
        if self.loading {
            return Err(SubmitOutcome::Busy);
        }
        if self.description.trim().is_empty() {
            self.error = Some(EMPTY_INPUT_MESSAGE.to_string());
            return Err(SubmitOutcome::EmptyInput);
        }

        self.usage.reset_if_new_day(today);
        if self.usage.is_exhausted() {
            self.error = Some(quota_message(self.usage.daily_limit()));
            return Err(SubmitOutcome::QuotaExhausted);
        }

        self.proposal = None;
        self.special_instructions.clear();
        self.error = None;
        self.copy_feedback.clear();
        self.loading = true;
        Ok(Submission {
            description: self.description.clone(),
        })
    }

    /// Records the endpoint's answer for a started submission.
    pub fn complete(
        &mut self,
        _submission: Submission,
        result: Result<GenerationResult, ClientError>,
        today: NaiveDate,
    ) -> SubmitOutcome {
        self.loading = false;
        match result {
            Ok(result) => {
                self.proposal = Some(result.proposal);
                self.special_instructions = result.special_instructions_found;
                self.usage.increment(today);
                info!(
                    "Proposal received ({} left today)",
                    self.usage.remaining()
                );
                SubmitOutcome::Generated
            }
            Err(e) => {
                warn!("Generation failed: {e}");
                self.error = Some(e.user_message().to_string());
                SubmitOutcome::Failed
            }
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Copies the current proposal. Returns `false` when there is nothing to copy.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> io::Result<bool> {
        let Some(proposal) = &self.proposal else {
            return Ok(false);
        };
        clipboard.set_text(proposal)?;
        self.copy_feedback.mark(now);
        Ok(true)
    }

    pub fn copy_label(&self, now: Instant) -> &'static str {
        self.copy_feedback.label(now)
    }

    pub fn proposal(&self) -> Option<&str> {
        self.proposal.as_deref()
    }

    pub fn special_instructions(&self) -> &[String] {
        &self.special_instructions
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn usage(&self) -> &UsageTracker<S> {
        &self.usage
    }
}

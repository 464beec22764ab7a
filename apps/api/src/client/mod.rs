//! Client side of the generator: form state, local usage quota, clipboard,
//! and the HTTP call to the generation endpoint.

pub mod api;
pub mod clipboard;
pub mod controller;
pub mod usage;

pub use api::{ClientError, GenerationApi, HttpGenerationApi};
pub use controller::{FormController, SubmitOutcome, Submission};
pub use usage::{FileUsageStore, MemoryUsageStore, UsageCounter, UsageStore, UsageTracker};

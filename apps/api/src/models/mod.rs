pub mod generation;

pub use generation::{GenerationRequest, GenerationResult};

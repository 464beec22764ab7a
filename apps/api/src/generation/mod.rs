// Proposal generation: prompt building, tone rules, reply normalization.
// All provider calls go through llm_client; nothing here speaks HTTP to a provider.

pub mod generator;
pub mod handlers;
pub mod normalize;
pub mod prompts;
pub mod tone;

//! Proposal generation — one prompt, one provider call, one parse.
//!
//! Flow: build prompt → LLM complete → strip fences → parse JSON.

use tracing::debug;

use crate::errors::AppError;
use crate::generation::normalize::parse_generation_result;
use crate::generation::prompts::build_proposal_prompt;
use crate::generation::tone::TonePolicy;
use crate::llm_client::LlmClient;
use crate::models::GenerationResult;

/// Generates a proposal for `description` with the configured provider.
pub async fn generate_proposal(
    llm: &LlmClient,
    api_key: &str,
    tone: &TonePolicy,
    description: &str,
) -> Result<GenerationResult, AppError> {
    let prompt = build_proposal_prompt(description, tone);
    debug!("Prompt built with tone '{}' ({} chars)", tone.name, prompt.len());

    let text = llm.complete(api_key, &prompt).await?;
    let result = parse_generation_result(&text)?;

    Ok(result)
}

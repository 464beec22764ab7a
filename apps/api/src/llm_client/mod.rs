//! LLM Client — the single point of entry for all provider API calls.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! The provider's wire shape lives in exactly one [`ProviderAdapter`],
//! chosen once at startup from [`ProviderKind`].
//!
//! One call per request: no retries, no caching, no batching.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

pub mod adapters;

pub use adapters::ProviderAdapter;

/// Fallback upstream message when the provider's error body has none.
pub const DEFAULT_UPSTREAM_MESSAGE: &str = "API request failed";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The provider failed and its error body was not JSON.
    #[error("Provider returned status {status} with an unreadable error body")]
    UnreadableError { status: u16 },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// The supported provider wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Anthropic Messages API.
    Anthropic,
    /// OpenAI Chat Completions API.
    OpenAiChat,
    /// OpenAI Responses API (generic `output` array).
    OpenAiResponses,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAiChat => "openai-chat",
            ProviderKind::OpenAiResponses => "openai-responses",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::OpenAiChat | ProviderKind::OpenAiResponses => "gpt-4o-mini",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::OpenAiChat | ProviderKind::OpenAiResponses => "https://api.openai.com",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn credential_var(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAiChat | ProviderKind::OpenAiResponses => "OPENAI_API_KEY",
        }
    }

    pub fn adapter(&self) -> Arc<dyn ProviderAdapter> {
        match self {
            ProviderKind::Anthropic => Arc::new(adapters::AnthropicMessages),
            ProviderKind::OpenAiChat => Arc::new(adapters::OpenAiChatCompletions),
            ProviderKind::OpenAiResponses => Arc::new(adapters::OpenAiResponses),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "openai-chat" => Ok(ProviderKind::OpenAiChat),
            "openai-responses" | "responses" => Ok(ProviderKind::OpenAiResponses),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// The single LLM client used by the generation endpoint.
/// Wraps one provider's HTTP API through its adapter.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    kind: ProviderKind,
    adapter: Arc<dyn ProviderAdapter>,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl LlmClient {
    pub fn new(
        kind: ProviderKind,
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            kind,
            adapter: kind.adapter(),
            base_url: base_url.into(),
            model: model.into(),
            max_tokens,
        })
    }

    pub fn provider(&self) -> ProviderKind {
        self.kind
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` to the provider and returns the raw answer text.
    ///
    /// A non-success status becomes [`LlmError::Api`] carrying the provider's
    /// own message, or [`LlmError::UnreadableError`] when that body is not JSON.
    pub async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.adapter.path()
        );
        let body = self.adapter.request_body(&self.model, self.max_tokens, prompt);

        let response = self
            .adapter
            .authorize(self.client.post(&url), api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} API returned {}: {}", self.kind, status, body);
            let message = adapters::error_message(&body)
                .map_err(|_| LlmError::UnreadableError {
                    status: status.as_u16(),
                })?
                .unwrap_or_else(|| DEFAULT_UPSTREAM_MESSAGE.to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let text = self.adapter.extract_answer_text(&raw)?;

        debug!("{} call succeeded: {} chars of answer text", self.kind, text.len());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses_aliases() {
        assert_eq!("anthropic".parse::<ProviderKind>(), Ok(ProviderKind::Anthropic));
        assert_eq!(" Claude ".parse::<ProviderKind>(), Ok(ProviderKind::Anthropic));
        assert_eq!("openai".parse::<ProviderKind>(), Ok(ProviderKind::OpenAiChat));
        assert_eq!(
            "openai-responses".parse::<ProviderKind>(),
            Ok(ProviderKind::OpenAiResponses)
        );
        assert!("mistral".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_display_round_trips() {
        for kind in [
            ProviderKind::Anthropic,
            ProviderKind::OpenAiChat,
            ProviderKind::OpenAiResponses,
        ] {
            assert_eq!(kind.to_string().parse::<ProviderKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_credential_var_per_provider() {
        assert_eq!(ProviderKind::Anthropic.credential_var(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderKind::OpenAiChat.credential_var(), "OPENAI_API_KEY");
    }
}

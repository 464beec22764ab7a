//! Provider adapters: each one knows a single provider's request shape and
//! where that provider nests the generated text in its reply.

use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::LlmError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Per-provider wire knowledge. Selected once at configuration time.
pub trait ProviderAdapter: Send + Sync {
    /// Path appended to the provider base URL.
    fn path(&self) -> &'static str;

    /// Attaches the provider's auth headers.
    fn authorize(&self, request: RequestBuilder, api_key: &str) -> RequestBuilder;

    /// Builds the request body carrying `prompt` as a single user turn.
    fn request_body(&self, model: &str, max_tokens: u32, prompt: &str) -> Value;

    /// Pulls the answer text out of the provider's raw success body.
    fn extract_answer_text(&self, raw: &str) -> Result<String, LlmError>;
}

/// Reads `error.message` from a provider error body.
///
/// `Err` means the body is not JSON at all; `Ok(None)` means it is JSON
/// without a usable message.
pub fn error_message(raw: &str) -> Result<Option<String>, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string))
}

fn non_empty(text: Option<String>) -> Result<String, LlmError> {
    text.filter(|t| !t.trim().is_empty())
        .ok_or(LlmError::EmptyContent)
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages
// ────────────────────────────────────────────────────────────────────────────

pub struct AnthropicMessages;

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl ProviderAdapter for AnthropicMessages {
    fn path(&self) -> &'static str {
        "/v1/messages"
    }

    fn authorize(&self, request: RequestBuilder, api_key: &str) -> RequestBuilder {
        request
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
    }

    fn request_body(&self, model: &str, max_tokens: u32, prompt: &str) -> Value {
        json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": [{ "role": "user", "content": prompt }]
        })
    }

    fn extract_answer_text(&self, raw: &str) -> Result<String, LlmError> {
        let response: AnthropicResponse = serde_json::from_str(raw)?;
        if let Some(usage) = &response.usage {
            debug!(
                "anthropic usage: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }
        let text = response
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text);
        non_empty(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI Chat Completions
// ────────────────────────────────────────────────────────────────────────────

pub struct OpenAiChatCompletions;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ProviderAdapter for OpenAiChatCompletions {
    fn path(&self) -> &'static str {
        "/v1/chat/completions"
    }

    fn authorize(&self, request: RequestBuilder, api_key: &str) -> RequestBuilder {
        request.bearer_auth(api_key)
    }

    fn request_body(&self, model: &str, max_tokens: u32, prompt: &str) -> Value {
        json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": [{ "role": "user", "content": prompt }]
        })
    }

    fn extract_answer_text(&self, raw: &str) -> Result<String, LlmError> {
        let response: ChatCompletionResponse = serde_json::from_str(raw)?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        non_empty(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI Responses
// ────────────────────────────────────────────────────────────────────────────

pub struct OpenAiResponses;

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

impl ProviderAdapter for OpenAiResponses {
    fn path(&self) -> &'static str {
        "/v1/responses"
    }

    fn authorize(&self, request: RequestBuilder, api_key: &str) -> RequestBuilder {
        request.bearer_auth(api_key)
    }

    fn request_body(&self, model: &str, max_tokens: u32, prompt: &str) -> Value {
        json!({
            "model": model,
            "max_output_tokens": max_tokens,
            "input": prompt
        })
    }

    fn extract_answer_text(&self, raw: &str) -> Result<String, LlmError> {
        let response: ResponsesResponse = serde_json::from_str(raw)?;
        // Reasoning items may precede the message item.
        let text = response
            .output
            .into_iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content)
            .find(|c| c.content_type == "output_text")
            .and_then(|c| c.text);
        non_empty(text)
    }
}

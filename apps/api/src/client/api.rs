use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{GenerationRequest, GenerationResult};

pub const NETWORK_ERROR_MESSAGE: &str =
    "Can't reach the proposal service. Check your connection and try again.";
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to generate proposal. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// No response arrived: DNS, refused connection, timeout.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// Short text for the user. Never the raw server payload.
    pub fn user_message(&self) -> &'static str {
        if self.is_network() {
            NETWORK_ERROR_MESSAGE
        } else {
            GENERIC_ERROR_MESSAGE
        }
    }
}

/// The client's view of the generation endpoint.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    async fn generate(&self, description: &str) -> Result<GenerationResult, ClientError>;
}

/// Calls the generation endpoint over HTTP.
#[derive(Clone)]
pub struct HttpGenerationApi {
    client: Client,
    endpoint: String,
}

impl HttpGenerationApi {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: endpoint.into(),
        })
    }
}

/// Reads the error message out of an endpoint error body.
/// Accepts `{"error": {"message": ..}}` and `{"error": ".."}`.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl GenerationApi for HttpGenerationApi {
    async fn generate(&self, description: &str) -> Result<GenerationResult, ClientError> {
        debug!("Calling {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerationRequest {
                description: description.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Response status: {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = server_message(&body)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            warn!("Generation failed: {message}");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<GenerationResult>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

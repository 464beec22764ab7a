use crate::config::CredentialSource;
use crate::generation::tone::TonePolicy;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Immutable after startup; every request works on its own clone.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Resolved per request. A missing key is a 500, never a silent no-op.
    pub credential: CredentialSource,
    pub tone: TonePolicy,
}

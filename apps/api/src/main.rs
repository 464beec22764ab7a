use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use proposal_api::config::{Config, CredentialSource};
use proposal_api::llm_client::LlmClient;
use proposal_api::routes::build_router;
use proposal_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "proposal_api={},tower_http={}",
                &config.rust_log, &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Proposal API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.provider,
        config.provider_url.clone(),
        config.model.clone(),
        config.max_tokens,
    )?;
    info!(
        "LLM client initialized (provider: {}, model: {}, url: {})",
        config.provider, config.model, config.provider_url
    );
    info!(
        "Tone policy '{}': {}-{} sentences",
        config.tone.name, config.tone.min_sentences, config.tone.max_sentences
    );

    let credential = CredentialSource::Env(config.provider.credential_var().to_string());
    if credential.resolve().is_none() {
        warn!(
            "{} is not set; /generate will answer 500 until it is",
            credential.describe()
        );
    }

    // Build app state
    let state = AppState {
        llm,
        credential,
        tone: config.tone.clone(),
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

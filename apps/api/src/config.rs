use anyhow::{bail, Context, Result};

use crate::generation::tone::TonePolicy;
use crate::llm_client::ProviderKind;

/// Application configuration loaded from environment variables.
///
/// The provider credential is not part of this struct. It is resolved per
/// request through [`CredentialSource`].
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub provider: ProviderKind,
    pub model: String,
    pub provider_url: String,
    pub max_tokens: u32,
    pub tone: TonePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider = match std::env::var("PROPOSAL_PROVIDER") {
            Ok(raw) => raw
                .parse::<ProviderKind>()
                .map_err(|e| anyhow::anyhow!("PROPOSAL_PROVIDER is invalid: {e}"))?,
            Err(_) => ProviderKind::Anthropic,
        };

        let tone = tone_from_vars(|key| std::env::var(key).ok())?;

        Ok(Config {
            port: optional_parse::<u16>("PORT")?.unwrap_or(8080),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model: std::env::var("PROPOSAL_MODEL")
                .unwrap_or_else(|_| provider.default_model().to_string()),
            provider_url: std::env::var("PROPOSAL_PROVIDER_URL")
                .unwrap_or_else(|_| provider.default_base_url().to_string()),
            max_tokens: optional_parse::<u32>("PROPOSAL_MAX_TOKENS")?.unwrap_or(1000),
            provider,
            tone,
        })
    }
}

fn optional_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    parse_var(key, std::env::var(key).ok())
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{key} has invalid value '{raw}'")),
        None => Ok(None),
    }
}

/// Builds the tone policy from `PROPOSAL_TONE` and its per-field overrides.
fn tone_from_vars(var: impl Fn(&str) -> Option<String>) -> Result<TonePolicy> {
    let mut tone = match var("PROPOSAL_TONE") {
        Some(raw) => TonePolicy::preset(&raw)
            .with_context(|| format!("PROPOSAL_TONE has unsupported value '{raw}'"))?,
        None => TonePolicy::kiss(),
    };
    if let Some(min) = parse_var::<u8>("PROPOSAL_MIN_SENTENCES", var("PROPOSAL_MIN_SENTENCES"))? {
        tone.min_sentences = min;
    }
    if let Some(max) = parse_var::<u8>("PROPOSAL_MAX_SENTENCES", var("PROPOSAL_MAX_SENTENCES"))? {
        tone.max_sentences = max;
    }
    if let Some(casual) = parse_var::<bool>("PROPOSAL_CASUAL", var("PROPOSAL_CASUAL"))? {
        tone.casual = casual;
    }
    if tone.min_sentences == 0 || tone.min_sentences > tone.max_sentences {
        bail!(
            "Sentence bounds must satisfy 1 <= min <= max (got {}..{})",
            tone.min_sentences,
            tone.max_sentences
        );
    }
    Ok(tone)
}

/// Where the provider API key comes from.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Read the named environment variable at request time.
    Env(String),
    /// A fixed value, used by tests and embedding callers.
    Fixed(Option<String>),
}

impl CredentialSource {
    /// Returns the credential if one is configured and non-blank.
    pub fn resolve(&self) -> Option<String> {
        let value = match self {
            CredentialSource::Env(var) => std::env::var(var).ok(),
            CredentialSource::Fixed(value) => value.clone(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Human-readable name of the credential for operator-facing messages.
    pub fn describe(&self) -> &str {
        match self {
            CredentialSource::Env(var) => var,
            CredentialSource::Fixed(_) => "provider API key",
        }
    }
}

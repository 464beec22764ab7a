//! Axum route handlers for the Generation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::generate_proposal;
use crate::models::GenerationResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /generate
///
/// Embeds the description in the proposal prompt, calls the provider once
/// and returns the parsed `{proposal, special_instructions_found}` object.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerationResult>, AppError> {
    // Misconfiguration is reported before anything about the body.
    let api_key = state
        .credential
        .resolve()
        .ok_or_else(|| AppError::MissingCredential(state.credential.describe().to_string()))?;

    let Json(body) = payload.map_err(|rejection| {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let description = body
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Description is required".to_string()))?;

    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        provider = %state.llm.provider(),
        model = state.llm.model(),
        description_chars = description.chars().count(),
        "Generating proposal"
    );

    match generate_proposal(&state.llm, &api_key, &state.tone, &description).await {
        Ok(result) => {
            info!(
                %request_id,
                special_instructions = result.special_instructions_found.len(),
                "Proposal generated"
            );
            Ok(Json(result))
        }
        Err(e) => {
            warn!(%request_id, "Proposal generation failed: {e}");
            Err(e)
        }
    }
}

/// Any other method on /generate. OPTIONS never gets here: the CORS layer
/// answers it with an empty 200.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

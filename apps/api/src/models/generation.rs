use serde::{Deserialize, Deserializer, Serialize};

/// Body sent by the client to the generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub description: String,
}

/// Parsed provider answer, returned to the client unchanged.
///
/// `special_instructions_found` keeps the provider's order and is empty when
/// the provider omits it or sends `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub proposal: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub special_instructions_found: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

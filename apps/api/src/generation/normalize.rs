//! Normalization between raw provider text and a parsed [`GenerationResult`].
//!
//! Pure and network-free. A reply that does not parse is rejected whole;
//! there is no partial salvage.

use thiserror::Error;

use crate::models::GenerationResult;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("reply is empty after removing code fences")]
    Empty,

    #[error("reply is not valid proposal JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("reply has an empty proposal")]
    EmptyProposal,
}

/// Strips a surrounding code fence (with or without a language tag).
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest
            .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            .trim();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim();
    }
    text
}

/// Parses the provider's answer text into a [`GenerationResult`].
pub fn parse_generation_result(raw: &str) -> Result<GenerationResult, ContractError> {
    let text = strip_code_fences(raw);
    if text.is_empty() {
        return Err(ContractError::Empty);
    }

    let result: GenerationResult = serde_json::from_str(text)?;
    if result.proposal.trim().is_empty() {
        return Err(ContractError::EmptyProposal);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_trailing_fence_only() {
        assert_eq!(strip_code_fences("{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_fenced_reply() {
        let raw = "```json\n{\"proposal\": \"Banana! I can design that logo.\", \"special_instructions_found\": [\"start proposal with the word Banana\"]}\n```";
        let result = parse_generation_result(raw).unwrap();
        assert!(result.proposal.starts_with("Banana"));
        assert_eq!(
            result.special_instructions_found,
            vec!["start proposal with the word Banana".to_string()]
        );
    }

    #[test]
    fn test_missing_instructions_defaults_to_empty() {
        let result = parse_generation_result(r#"{"proposal": "Hi there."}"#).unwrap();
        assert!(result.special_instructions_found.is_empty());
    }

    #[test]
    fn test_null_instructions_becomes_empty() {
        let raw = r#"{"proposal": "Hi there.", "special_instructions_found": null}"#;
        let result = parse_generation_result(raw).unwrap();
        assert_eq!(result.proposal, "Hi there.");
        assert!(result.special_instructions_found.is_empty());
    }

    #[test]
    fn test_non_string_instructions_are_rejected() {
        let raw = r#"{"proposal": "Hi there.", "special_instructions_found": [1, 2]}"#;
        assert!(parse_generation_result(raw).is_err());
    }

    #[test]
    fn test_prose_reply_is_rejected() {
        let err = parse_generation_result("Sure! Here's your proposal: I can help.").unwrap_err();
        assert!(matches!(err, ContractError::InvalidJson(_)));
    }

    #[test]
    fn test_prose_around_fence_is_not_salvaged() {
        let raw = "Here you go:\n```json\n{\"proposal\": \"Hi\"}\n```";
        assert!(parse_generation_result(raw).is_err());
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        assert!(parse_generation_result(r#"{"text": "Hi"}"#).is_err());
        assert!(parse_generation_result(r#"{"proposal": 42}"#).is_err());
    }

    #[test]
    fn test_empty_fence_is_rejected() {
        assert!(matches!(
            parse_generation_result("```json\n```"),
            Err(ContractError::Empty)
        ));
    }

    #[test]
    fn test_blank_proposal_is_rejected() {
        assert!(matches!(
            parse_generation_result(r#"{"proposal": "  ", "special_instructions_found": []}"#),
            Err(ContractError::EmptyProposal)
        ));
    }
}

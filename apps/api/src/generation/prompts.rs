// Prompt template for proposal generation.

use crate::generation::tone::TonePolicy;

/// Proposal prompt template. Replace `{tone_rules}` then `{description}`.
pub const PROPOSAL_PROMPT_TEMPLATE: &str = r#"You are an expert freelance proposal writer. Write a short, simple proposal for this job post.

JOB POST:
{description}

INSTRUCTIONS:
1. First, scan the job post for ANY special instructions aimed at applicants (for example "put the number 88 in your application", "start with the word X", "mention Y in your reply").
2. If you find any, you MUST follow every one of them in the proposal.
3. Write the proposal in the first person:
{tone_rules}
4. The proposal must make complete sense on its own despite being brief.

Return ONLY a JSON object with this exact structure (no markdown, no code fences, no commentary):
{
  "proposal": "the complete proposal text",
  "special_instructions_found": ["each special instruction you found and followed"]
}
Use an empty list for "special_instructions_found" when the job post has none."#;

/// Builds the full prompt, embedding the description verbatim.
pub fn build_proposal_prompt(description: &str, tone: &TonePolicy) -> String {
    // Description goes in last so its text is never scanned for placeholders.
    PROPOSAL_PROMPT_TEMPLATE
        .replace("{tone_rules}", &tone.render_rules())
        .replace("{description}", description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_description_verbatim() {
        let description = "Need a logo designed.\nPlease start your proposal with the word 'Banana'.";
        let prompt = build_proposal_prompt(description, &TonePolicy::kiss());
        assert!(prompt.contains(description));
        assert!(!prompt.contains("{description}"));
        assert!(!prompt.contains("{tone_rules}"));
    }

    #[test]
    fn test_prompt_names_both_reply_fields() {
        let prompt = build_proposal_prompt("anything", &TonePolicy::kiss());
        assert!(prompt.contains("\"proposal\""));
        assert!(prompt.contains("\"special_instructions_found\""));
    }

    #[test]
    fn test_placeholder_inside_description_is_left_alone() {
        let prompt = build_proposal_prompt("literal {tone_rules} text", &TonePolicy::brief());
        assert!(prompt.contains("literal {tone_rules} text"));
    }

    #[test]
    fn test_prompt_carries_tone_rules() {
        let prompt = build_proposal_prompt("job", &TonePolicy::brief());
        assert!(prompt.contains("Never use em dashes"));
    }
}

//! Tone calibration — the length and voice rules a proposal must follow.
//!
//! The rules are configuration, not structure: changing them never changes
//! the reply shape the prompt asks for.

/// Phrases that make a proposal sound like a template.
const GENERIC_OPENERS: &[&str] = &["I read your posting", "I'm interested"];

/// Length and voice rules rendered into the generation prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct TonePolicy {
    pub name: String,
    pub min_sentences: u8,
    pub max_sentences: u8,
    /// Contractions, first person, no corporate phrasing. When off, the
    /// prompt asks for a professional voice instead.
    pub casual: bool,
    pub avoid_em_dash: bool,
    pub banned_phrases: Vec<String>,
}

impl TonePolicy {
    /// Keep-it-short-and-simple: 2-4 casual sentences.
    pub fn kiss() -> Self {
        Self {
            name: "kiss".to_string(),
            min_sentences: 2,
            max_sentences: 4,
            casual: true,
            avoid_em_dash: false,
            banned_phrases: GENERIC_OPENERS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Even shorter: 1-3 sentences, no em dashes.
    pub fn brief() -> Self {
        let mut banned: Vec<String> = GENERIC_OPENERS.iter().map(|p| p.to_string()).collect();
        banned.push("I came across your job".to_string());
        Self {
            name: "brief".to_string(),
            min_sentences: 1,
            max_sentences: 3,
            casual: true,
            avoid_em_dash: true,
            banned_phrases: banned,
        }
    }

    /// Looks up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "kiss" => Some(Self::kiss()),
            "brief" => Some(Self::brief()),
            _ => None,
        }
    }

    /// Renders the policy as numbered-list-friendly prompt lines.
    pub fn render_rules(&self) -> String {
        let mut rules = Vec::new();

        if self.min_sentences == self.max_sentences {
            rules.push(format!(
                "Write exactly {} sentence{}",
                self.min_sentences,
                if self.min_sentences == 1 { "" } else { "s" }
            ));
        } else {
            rules.push(format!(
                "Write {}-{} sentences, no more",
                self.min_sentences, self.max_sentences
            ));
        }

        if self.casual {
            rules.push(
                "Use a casual, friendly first-person tone, like messaging a colleague, not a formal letter"
                    .to_string(),
            );
            rules.push("Use contractions and skip the corporate speak".to_string());
        } else {
            rules.push("Use a professional, first-person tone".to_string());
        }

        rules.push("Open with value for the client, not with yourself".to_string());
        rules.push(
            "Show you understand their exact requirements and get straight to the solution"
                .to_string(),
        );

        if self.avoid_em_dash {
            rules.push("Never use em dashes".to_string());
        }

        if !self.banned_phrases.is_empty() {
            let quoted: Vec<String> = self
                .banned_phrases
                .iter()
                .map(|p| format!("\"{p}\""))
                .collect();
            rules.push(format!("Avoid generic phrases like {}", quoted.join(" or ")));
        }

        rules
            .into_iter()
            .map(|r| format!("   - {r}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TonePolicy {
    fn default() -> Self {
        Self::kiss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kiss_bounds() {
        let t = TonePolicy::kiss();
        assert_eq!((t.min_sentences, t.max_sentences), (2, 4));
        assert!(t.render_rules().contains("Write 2-4 sentences"));
        assert!(!t.render_rules().contains("em dash"));
    }

    #[test]
    fn test_brief_forbids_em_dash() {
        let rules = TonePolicy::brief().render_rules();
        assert!(rules.contains("Write 1-3 sentences"));
        assert!(rules.contains("Never use em dashes"));
        assert!(rules.contains("\"I came across your job\""));
    }

    #[test]
    fn test_exact_sentence_count_wording() {
        let mut t = TonePolicy::kiss();
        t.min_sentences = 1;
        t.max_sentences = 1;
        assert!(t.render_rules().contains("Write exactly 1 sentence\n"));
    }

    #[test]
    fn test_preset_lookup_is_case_insensitive() {
        assert_eq!(TonePolicy::preset("BRIEF"), Some(TonePolicy::brief()));
        assert_eq!(TonePolicy::preset("formal"), None);
    }

    #[test]
    fn test_professional_voice_when_not_casual() {
        let mut t = TonePolicy::kiss();
        t.casual = false;
        let rules = t.render_rules();
        assert!(rules.contains("Use a professional, first-person tone"));
        assert!(!rules.contains("contractions"));
        assert!(!rules.contains("casual"));
    }
}

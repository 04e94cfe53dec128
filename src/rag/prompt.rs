//! Grounded prompt construction.

use crate::config::Prompts;
use std::collections::HashMap;

/// Substitute `context` and `query` into `template`.
///
/// Neither value is escaped or delimited beyond what the template itself
/// provides.
pub fn build_prompt(template: &str, context: &str, query: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("context".to_string(), context.to_string());
    vars.insert("question".to_string(), query.to_string());
    Prompts::render(template, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        let template = Prompts::default().rag.user;
        let context = "Ilan: Timing matters a lot.\n\nJonathan: We waited too long.";
        let prompt = build_prompt(&template, context, "What does Ilan say about timing?");

        assert!(prompt.contains("Excerpts:\nIlan: Timing matters a lot.\n\nJonathan: We waited too long.\n"));
        assert!(prompt.contains("Question: What does Ilan say about timing?\nAnswer:"));
        assert!(prompt.contains("never say 'a guest' or 'another speaker'"));
        assert!(prompt.contains("bullet points"));
    }

    #[test]
    fn test_empty_context_keeps_section() {
        let template = Prompts::default().rag.user;
        let prompt = build_prompt(&template, "", "Anything?");
        assert!(prompt.contains("Excerpts:\n\n\nQuestion: Anything?"));
    }

    #[test]
    fn test_deterministic() {
        let a = build_prompt("{{context}}|{{question}}", "c", "q");
        let b = build_prompt("{{context}}|{{question}}", "c", "q");
        assert_eq!(a, "c|q");
        assert_eq!(a, b);
    }
}

//! Rendering retrieved matches as prompt context and display sources.

use crate::vector_index::Match;

/// Join matches as `"{speaker}: {text}"` blocks separated by blank lines.
///
/// Ranking order is preserved. No matches yields an empty string.
pub fn format_context(matches: &[Match]) -> String {
    matches
        .iter()
        .map(|m| format!("{}: {}", m.speaker(), m.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Markdown bullet list of matches for display.
pub fn format_sources(matches: &[Match]) -> String {
    matches
        .iter()
        .map(|m| format!("- **{}**: {}", m.speaker(), m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(speaker: Option<&str>, text: &str) -> Match {
        Match {
            id: text.to_string(),
            score: 0.5,
            speaker: speaker.map(str::to_string),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_context_joins_in_order() {
        let matches = vec![
            m(Some("Ilan"), "Timing matters a lot."),
            m(Some("Jonathan"), "We waited too long."),
        ];
        assert_eq!(
            format_context(&matches),
            "Ilan: Timing matters a lot.\n\nJonathan: We waited too long."
        );
    }

    #[test]
    fn test_context_unknown_speaker() {
        assert_eq!(format_context(&[m(None, "Hello.")]), "Unknown: Hello.");
    }

    #[test]
    fn test_empty_matches() {
        assert_eq!(format_context(&[]), "");
        assert_eq!(format_sources(&[]), "");
    }

    #[test]
    fn test_sources_markdown() {
        let matches = vec![m(Some("Ilan"), "One."), m(None, "Two.")];
        assert_eq!(format_sources(&matches), "- **Ilan**: One.\n- **Unknown**: Two.");
    }
}

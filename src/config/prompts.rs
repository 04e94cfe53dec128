//! Prompt templates for podrag.
//!
//! The answering prompt can be customized by placing a `rag.toml` file in the
//! custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub rag: RagPrompts,
}

/// Prompt used for grounded answer generation.
///
/// `{{context}}` receives the speaker-attributed excerpts and `{{question}}`
/// the user's query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub user: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            user: r#"You are a helpful assistant trained on podcast transcripts from the podcast 'Zero to One'.
Each excerpt includes content spoken by a specific guest or co-host.
When answering the question, always include the name of the speaker.
Do not refer to "a guest" or "another speaker" — instead, say "Jonathan said..." or "Ilan mentioned that..." etc.
When answering, never say 'a guest' or 'another speaker'. Always use the speaker's name exactly as shown in the excerpts.

Provide a summary of each answer you are providing with bullet points.

Use the following excerpts to answer the user's question.

Excerpts:
{{context}}

Question: {{question}}
Answer:
"#
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, applying overrides from a custom directory if given.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are replaced in a single left-to-right pass, so `{{...}}`
    /// text inside a substituted value is emitted verbatim. Unknown
    /// placeholders are left untouched.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let key = &after[..end];
                    match vars.get(key.trim()) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("{{");
                            out.push_str(key);
                            out.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

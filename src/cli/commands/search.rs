//! Search command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, top_k: usize, mut settings: Settings) -> Result<()> {
    let query = preflight::check_question(query).map_err(|msg| anyhow::anyhow!(msg))?;

    // Retrieval only; nothing is generated, so nothing is validated.
    settings.validation.enabled = false;
    let secrets = preflight::check(&settings)?;
    let orchestrator = Orchestrator::with_secrets(settings, &secrets).await?;

    let spinner = Output::spinner("Searching...");
    let results = orchestrator.pipeline().retrieve(query, top_k).await;
    spinner.finish_and_clear();

    match results {
        Ok(matches) => {
            if matches.is_empty() {
                Output::warning("No excerpts found matching your query.");
            } else {
                Output::success(&format!("Found {} excerpts", matches.len()));
                for m in &matches {
                    Output::excerpt(m.speaker(), m.score, &m.text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

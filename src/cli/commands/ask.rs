//! Ask command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::{Settings, ValidationMode};
use crate::orchestrator::Orchestrator;
use crate::rag::QueryOptions;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    top_k: Option<usize>,
    show_sources: bool,
    mut settings: Settings,
) -> Result<()> {
    let question = match preflight::check_question(question) {
        Ok(q) => q,
        Err(msg) => {
            Output::error(msg);
            anyhow::bail!(msg);
        }
    };

    let secrets = match preflight::check(&settings) {
        Ok(secrets) => secrets,
        Err(e) => {
            Output::error(&e.to_string());
            Output::info("Run 'podrag doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    // A detached task would be dropped when the process exits.
    settings.validation.mode = ValidationMode::Inline;

    let orchestrator = Orchestrator::with_secrets(settings, &secrets).await?;
    let pipeline = orchestrator.pipeline();

    let mut options: QueryOptions = pipeline.defaults().clone();
    if let Some(model) = model {
        options.model = model;
    }
    if let Some(top_k) = top_k {
        options.top_k = top_k;
    }

    let spinner = Output::spinner("Thinking...");
    let result = pipeline.answer_query_with(question, &options).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if show_sources {
                Output::header("Source excerpts");
                if response.matches.is_empty() {
                    Output::info("No excerpts were retrieved for this question.");
                }
                for m in &response.matches {
                    Output::excerpt(m.speaker(), m.score, &m.text);
                }
                println!();
            }
        }
        Err(e) => {
            Output::error(&format!("Something went wrong: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

//! Pre-flight checks before starting the pipeline.
//!
//! Reports missing credentials up front instead of failing on the first
//! outbound call.

use crate::config::{Secrets, Settings};
use crate::error::Result;
use crate::orchestrator::Orchestrator;

/// Verify that every credential the configuration needs is present.
pub fn check(settings: &Settings) -> Result<Secrets> {
    Secrets::from_env(Orchestrator::requirements(settings))
}

/// Validate a user-supplied question.
pub fn check_question(question: &str) -> std::result::Result<&str, &'static str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        Err("Question must not be empty")
    } else {
        Ok(trimmed)
    }
}

//! Trace validation against an external guardrail service.
//!
//! Validation is best-effort. The pipeline logs any [`ValidationError`] and
//! carries on, so a broken or unreachable service never changes the answer a
//! user sees.

mod arthur;

pub use arthur::ArthurValidator;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// One question/answer exchange submitted for validation.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    /// Text submitted to the prompt check.
    pub prompt: String,
    /// Generated answer.
    pub response: String,
    /// Retrieved context the answer was grounded on.
    pub context: String,
    /// Fresh per exchange; there is no session continuity.
    pub conversation_id: Uuid,
}

impl Trace {
    /// Create a trace with a newly generated conversation ID.
    pub fn new(prompt: impl Into<String>, response: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            context: context.into(),
            conversation_id: Uuid::new_v4(),
        }
    }
}

/// Result of a completed validation round.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub inference_id: String,
    pub prompt_result: serde_json::Value,
    pub response_result: serde_json::Value,
}

/// Failures on the validation path. Always swallowed by the pipeline.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("validation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("validation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("validation service reply had no inference_id")]
    MissingInferenceId,

    #[error("invalid validation endpoint: {0}")]
    Url(#[from] url::ParseError),
}

/// Trait for trace validators.
#[async_trait]
pub trait TraceValidator: Send + Sync {
    /// Submit a trace. Implementations report every failure as an error and
    /// leave suppression to the caller.
    async fn validate(&self, trace: &Trace) -> Result<ValidationOutcome, ValidationError>;
}

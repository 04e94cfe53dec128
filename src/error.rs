//! Error types for podrag.

use std::fmt;
use thiserror::Error;

/// Library-level error type for podrag operations.
///
/// Every failure on the answering path (embed, retrieve, generate) is one of
/// these and reaches the caller unchanged. Trace validation has its own
/// [`ValidationError`](crate::validation::ValidationError) and never surfaces
/// here.
#[derive(Error, Debug)]
pub enum PodragError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Pipeline stage a primary-path error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embed,
    Retrieve,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Embed => write!(f, "embed"),
            Stage::Retrieve => write!(f, "retrieve"),
            Stage::Generate => write!(f, "generate"),
        }
    }
}

impl PodragError {
    /// The pipeline stage this error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PodragError::Embedding(_) => Some(Stage::Embed),
            PodragError::VectorIndex(_) => Some(Stage::Retrieve),
            PodragError::Generation(_) => Some(Stage::Generate),
            _ => None,
        }
    }
}

/// Result type alias for podrag operations.
pub type Result<T> = std::result::Result<T, PodragError>;

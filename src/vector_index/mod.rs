//! Vector index abstraction for podrag.
//!
//! The index is an external collaborator: podrag only ever asks it for the
//! `top_k` nearest transcript chunks to a query embedding.

mod memory;
mod pinecone;

pub use memory::{IndexRecord, MemoryIndex};
pub use pinecone::PineconeIndex;

use crate::error::{PodragError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Speaker label used when a chunk carries no `speaker` metadata.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// A retrieved transcript chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Record ID in the index.
    pub id: String,
    /// Similarity score (higher is better).
    pub score: f32,
    /// Who spoke this chunk, if recorded.
    pub speaker: Option<String>,
    /// Transcript text.
    pub text: String,
}

impl Match {
    /// Speaker name, or `"Unknown"` when the index has none.
    pub fn speaker(&self) -> &str {
        self.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER)
    }

    /// Build a match from raw index metadata.
    ///
    /// `text` is required; `speaker` is optional and must be a string when
    /// present.
    pub fn from_metadata(id: String, score: f32, metadata: Option<&Map<String, Value>>) -> Result<Self> {
        let metadata = metadata.ok_or_else(|| {
            PodragError::VectorIndex(format!("Match {} has no metadata", id))
        })?;

        let text = metadata
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                PodragError::VectorIndex(format!("Match {} has no text metadata", id))
            })?
            .to_string();

        let speaker = metadata
            .get("speaker")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            id,
            score,
            speaker,
            text,
        })
    }
}

/// Trait for vector index backends.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` matches for `vector`, most similar first.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_match_from_metadata() {
        let m = meta(json!({"speaker": "Ilan", "text": "Timing matters a lot.", "episode": 4}));
        let parsed = Match::from_metadata("c1".into(), 0.9, Some(&m)).unwrap();
        assert_eq!(parsed.speaker(), "Ilan");
        assert_eq!(parsed.text, "Timing matters a lot.");
    }

    #[test]
    fn test_missing_speaker_defaults_to_unknown() {
        let m = meta(json!({"text": "We waited too long."}));
        let parsed = Match::from_metadata("c2".into(), 0.5, Some(&m)).unwrap();
        assert_eq!(parsed.speaker, None);
        assert_eq!(parsed.speaker(), UNKNOWN_SPEAKER);
    }

    #[test]
    fn test_missing_text_is_an_error() {
        let m = meta(json!({"speaker": "Ilan"}));
        let err = Match::from_metadata("c3".into(), 0.5, Some(&m)).unwrap_err();
        assert!(matches!(err, PodragError::VectorIndex(_)));

        let err = Match::from_metadata("c4".into(), 0.5, None).unwrap_err();
        assert!(err.to_string().contains("no metadata"));
    }
}

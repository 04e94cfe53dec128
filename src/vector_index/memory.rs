//! In-memory vector index.
//!
//! Useful for testing and for running against an exported snapshot of the
//! transcript index without network access.

use super::{cosine_similarity, Match, VectorIndex};
use crate::error::{PodragError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::RwLock;
use tracing::info;

/// A stored vector with its metadata, in Pinecone's export shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// In-memory vector index.
pub struct MemoryIndex {
    records: RwLock<Vec<IndexRecord>>,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create an index holding the given records.
    pub fn with_records(records: Vec<IndexRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Load records from a JSON array file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<IndexRecord> = serde_json::from_str(&content)?;
        info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self::with_records(records))
    }

    /// Insert or replace a record by ID.
    pub fn upsert(&self, record: IndexRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| PodragError::VectorIndex("Index lock poisoned".to_string()))?;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>> {
        let records = self
            .records
            .read()
            .map_err(|_| PodragError::VectorIndex("Index lock poisoned".to_string()))?;

        let mut scored: Vec<(f32, &IndexRecord)> = records
            .iter()
            .map(|r| (cosine_similarity(vector, &r.values), r))
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(score, r)| Match::from_metadata(r.id.clone(), score, r.metadata.as_ref()))
            .collect()
    }
}

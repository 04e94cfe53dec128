//! OpenAI embeddings implementation.

use super::Embedder;
use crate::error::{PodragError, Result};
use crate::openai::OpenAIClient;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: OpenAIClient,
    model: String,
    dimensions: Option<u32>,
}

impl OpenAIEmbedder {
    /// Create an embedder for `text-embedding-3-small` at its native size.
    pub fn new(client: OpenAIClient) -> Self {
        Self::with_config(client, "text-embedding-3-small", None)
    }

    /// Create an embedder with a custom model and optional dimensions.
    pub fn with_config(client: OpenAIClient, model: &str, dimensions: Option<u32>) -> Self {
        Self {
            client,
            model: model.to_string(),
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text), fields(model = %self.model))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut args = CreateEmbeddingRequestArgs::default();
        args.model(&self.model)
            .input(EmbeddingInput::StringArray(vec![text.to_string()]));
        if let Some(dimensions) = self.dimensions {
            args.dimensions(dimensions);
        }
        let request = args
            .build()
            .map_err(|e| PodragError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| PodragError::Embedding(format!("Embedding API error: {}", e)))?;

        let embedding = response
            .data
            .into_iter()
            .min_by_key(|e| e.index)
            .map(|e| e.embedding)
            .ok_or_else(|| PodragError::Embedding("Empty embedding response".to_string()))?;

        debug!("Generated embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAISettings;
    use crate::openai::create_client;
    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_embedder_creation() {
        let client = create_client(&OpenAISettings::default(), "sk-test").unwrap();

        let embedder = OpenAIEmbedder::new(client.clone());
        assert_eq!(embedder.model(), "text-embedding-3-small");
        assert_eq!(embedder.dimensions, None);

        let embedder = OpenAIEmbedder::with_config(client, "text-embedding-3-large", Some(1024));
        assert_eq!(embedder.model(), "text-embedding-3-large");
        assert_eq!(embedder.dimensions, Some(1024));
    }

    async fn embedder(dimensions: Option<u32>) -> (Arc<Mutex<Vec<Value>>>, OpenAIEmbedder) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/v1/embeddings",
                post(|State(seen): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(body);
                    Json(json!({
                        "object": "list",
                        "model": "text-embedding-3-small",
                        "data": [{"object": "embedding", "index": 0, "embedding": [0.25, -0.5, 1.0]}],
                        "usage": {"prompt_tokens": 4, "total_tokens": 4}
                    }))
                }),
            )
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let settings = OpenAISettings {
            api_base: Some(format!("http://{}/v1", addr)),
            ..OpenAISettings::default()
        };
        let client = create_client(&settings, "sk-test").unwrap();
        let embedder = OpenAIEmbedder::with_config(client, "text-embedding-3-small", dimensions);
        (seen, embedder)
    }

    #[tokio::test]
    async fn test_embed_single_query() {
        let (seen, embedder) = embedder(None).await;

        let vector = embedder.embed("What does Ilan say about timing?").await.unwrap();
        assert_eq!(vector, vec![0.25, -0.5, 1.0]);

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["model"], "text-embedding-3-small");
        assert_eq!(requests[0]["input"], json!(["What does Ilan say about timing?"]));
        assert!(requests[0].get("dimensions").is_none());
    }

    #[tokio::test]
    async fn test_embed_passes_dimensions() {
        let (seen, embedder) = embedder(Some(512)).await;
        embedder.embed("q").await.unwrap();
        assert_eq!(seen.lock().unwrap()[0]["dimensions"], 512);
    }
}

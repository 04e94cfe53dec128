//! Pinecone vector index over its REST API.

use super::{Match, VectorIndex};
use crate::error::{PodragError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

/// Pinecone control-plane endpoint used to look up index hosts.
pub const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

const API_VERSION: &str = "2024-07";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Deserialize)]
struct RawMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

/// Handle to a single Pinecone index.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    namespace: Option<String>,
}

impl PineconeIndex {
    /// Create a handle for a known data-plane host.
    ///
    /// `host` may be a bare hostname as reported by Pinecone or a full URL.
    pub fn new(api_key: &str, host: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: normalize_host(host),
            namespace: None,
        }
    }

    /// Restrict queries to a namespace.
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Resolve an index by name through the control plane.
    pub async fn connect(api_key: &str, name: &str) -> Result<Self> {
        Self::connect_via(CONTROL_PLANE_URL, api_key, name).await
    }

    /// Resolve an index by name through a specific control-plane URL.
    #[instrument(skip(api_key))]
    pub async fn connect_via(control_plane: &str, api_key: &str, name: &str) -> Result<Self> {
        let client = reqwest::Client::new();
        let url = format!("{}/indexes/{}", control_plane.trim_end_matches('/'), name);

        let response = client
            .get(&url)
            .header("Api-Key", api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| PodragError::VectorIndex(format!("Failed to describe index: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PodragError::VectorIndex(format!(
                "Describe index '{}' returned {}: {}",
                name, status, body
            )));
        }

        let described: DescribeIndexResponse = response
            .json()
            .await
            .map_err(|e| PodragError::VectorIndex(format!("Invalid describe response: {}", e)))?;

        info!("Resolved index '{}' to host {}", name, described.host);

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: normalize_host(&described.host),
            namespace: None,
        })
    }

    /// Data-plane base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    #[instrument(skip(self, vector), fields(dims = vector.len()))]
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/query", self.base_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| PodragError::VectorIndex(format!("Query request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PodragError::VectorIndex(format!(
                "Query returned {}: {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| PodragError::VectorIndex(format!("Invalid query response: {}", e)))?;

        debug!("Index returned {} matches", parsed.matches.len());

        parsed
            .matches
            .into_iter()
            .map(|m| Match::from_metadata(m.id, m.score, m.metadata.as_ref()))
            .collect()
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Seen {
        bodies: Mutex<Vec<Value>>,
        keys: Mutex<Vec<String>>,
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn query_handler(
        State(seen): State<Arc<Seen>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        seen.bodies.lock().unwrap().push(body);
        if let Some(key) = headers.get("Api-Key") {
            seen.keys.lock().unwrap().push(key.to_str().unwrap().to_string());
        }
        Json(json!({
            "matches": [
                {"id": "a", "score": 0.92, "metadata": {"speaker": "Ilan", "text": "Timing matters a lot."}},
                {"id": "b", "score": 0.81, "metadata": {"text": "We waited too long."}}
            ],
            "namespace": ""
        }))
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("podcastrag2-abc.svc.pinecone.io"),
            "https://podcastrag2-abc.svc.pinecone.io"
        );
        assert_eq!(normalize_host("http://127.0.0.1:9000/"), "http://127.0.0.1:9000");
    }

    #[tokio::test]
    async fn test_query_sends_top_k_and_parses_matches() {
        let seen = Arc::new(Seen::default());
        let app = Router::new()
            .route("/query", post(query_handler))
            .with_state(seen.clone());
        let base = spawn(app).await;

        let index = PineconeIndex::new("pc-key", &base);
        let matches = index.query(&[0.1, 0.2], 2).await.unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].speaker(), "Ilan");
        assert_eq!(matches[1].speaker(), "Unknown");

        let bodies = seen.bodies.lock().unwrap();
        assert_eq!(bodies[0]["topK"], 2);
        assert_eq!(bodies[0]["includeMetadata"], true);
        assert!(bodies[0].get("namespace").is_none());
        assert_eq!(seen.keys.lock().unwrap()[0], "pc-key");
    }

    #[tokio::test]
    async fn test_query_error_status_propagates() {
        let app = Router::new().route(
            "/query",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        );
        let base = spawn(app).await;

        let index = PineconeIndex::new("pc-key", &base);
        let err = index.query(&[0.1], 5).await.unwrap_err();
        assert!(matches!(err, PodragError::VectorIndex(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_connect_resolves_host() {
        let app = Router::new().route(
            "/indexes/{name}",
            get(|axum::extract::Path(name): axum::extract::Path<String>| async move {
                Json(json!({"name": name, "host": "podcastrag2-xyz.svc.pinecone.io"}))
            }),
        );
        let control = spawn(app).await;

        let index = PineconeIndex::connect_via(&control, "pc-key", "podcastrag2")
            .await
            .unwrap();
        assert_eq!(index.base_url(), "https://podcastrag2-xyz.svc.pinecone.io");
    }

    #[tokio::test]
    async fn test_connect_unknown_index_fails() {
        let app = Router::new().route(
            "/indexes/{name}",
            get(|| async { (StatusCode::NOT_FOUND, "not found") }),
        );
        let control = spawn(app).await;

        let result = PineconeIndex::connect_via(&control, "pc-key", "missing").await;
        assert!(result.is_err());
    }
}

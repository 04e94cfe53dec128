//! Web chatbot and JSON API.
//!
//! `GET /` serves a single-page chatbot; `POST /ask` runs the pipeline.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::{QueryOptions, RagPipeline};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared application state.
struct AppState {
    pipeline: Arc<RagPipeline>,
}

/// Run the HTTP server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let secrets = match preflight::check(&settings) {
        Ok(secrets) => secrets,
        Err(e) => {
            Output::error(&e.to_string());
            Output::info("Run 'podrag doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };
    let orchestrator = Orchestrator::with_secrets(settings, &secrets).await?;

    let app = router(orchestrator.pipeline());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Zero to One Podcast Chatbot");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Chatbot", "GET  /");
    Output::kv("Ask (RAG)", "POST /ask");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(pipeline: Arc<RagPipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ask", post(ask))
        .layer(cors)
        .with_state(Arc::new(AppState { pipeline }))
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    question: String,
    #[serde(default)]
    top_k: Option<usize>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    context: String,
    sources: String,
    excerpts: Vec<ExcerptInfo>,
}

#[derive(Serialize)]
struct ExcerptInfo {
    speaker: String,
    text: String,
    score: f32,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> impl IntoResponse {
    let question = match preflight::check_question(&req.question) {
        Ok(q) => q,
        Err(msg) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: msg.to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut options: QueryOptions = state.pipeline.defaults().clone();
    if let Some(top_k) = req.top_k {
        options.top_k = top_k;
    }
    if let Some(model) = req.model {
        options.model = model;
    }

    match state.pipeline.answer_query_with(question, &options).await {
        Ok(response) => Json(AskResponse {
            excerpts: response
                .matches
                .iter()
                .map(|m| ExcerptInfo {
                    speaker: m.speaker().to_string(),
                    text: m.text.clone(),
                    score: m.score,
                })
                .collect(),
            answer: response.answer,
            context: response.context,
            sources: response.sources,
        })
        .into_response(),
        Err(e) => {
            error!("Pipeline failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Zero to One RAG Bot</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; }
  input { width: 100%; padding: .6rem; font-size: 1rem; box-sizing: border-box; }
  .answer { background: #eaf7ee; border-radius: 6px; padding: 1rem; white-space: pre-wrap; }
  .error { background: #fdecea; border-radius: 6px; padding: 1rem; }
  .note { font-style: italic; color: #555; }
  li.src { margin-bottom: .5rem; }
</style>
</head>
<body>
<h2>Zero to One Podcast Chatbot</h2>
<form id="ask">
  <label for="q">Ask a question:</label>
  <input id="q" name="q" autocomplete="off">
</form>
<div id="out"></div>
<h4>Example questions:</h4>
<ul>
  <li><em>What does Ilan Abehassera say about timing when starting a company?</em></li>
  <li><em>How to find product market fit?</em></li>
  <li><em>What are the differences between launching in the US vs. France?</em></li>
</ul>
<script>
const out = document.getElementById("out");
const el = (tag, cls, text) => { const e = document.createElement(tag); if (cls) e.className = cls; if (text) e.textContent = text; return e; };
document.getElementById("ask").addEventListener("submit", async (ev) => {
  ev.preventDefault();
  const question = document.getElementById("q").value.trim();
  if (!question) return;
  out.replaceChildren(el("p", null, "Thinking..."));
  try {
    const res = await fetch("/ask", { method: "POST", headers: { "Content-Type": "application/json" }, body: JSON.stringify({ question }) });
    const body = await res.json();
    if (!res.ok) throw new Error(body.error || res.statusText);
    const details = el("details");
    details.append(el("summary", null, "Show source excerpts"));
    const list = el("ul");
    for (const x of body.excerpts) {
      const li = el("li", "src");
      li.append(el("strong", null, x.speaker), document.createTextNode(": " + x.text));
      list.append(li);
    }
    details.append(list);
    out.replaceChildren(
      el("div", "answer", body.answer),
      details,
      el("p", "note", "This answer was validated using ArthurAI's hallucination detection."));
  } catch (err) {
    out.replaceChildren(el("div", "error", "Something went wrong: " + err.message));
  }
});
</script>
</body>
</html>
"#;

//! Arthur guardrail task client.

use super::{Trace, TraceValidator, ValidationError, ValidationOutcome};
use crate::config::ValidationSettings;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;
use uuid::Uuid;

#[derive(Serialize)]
struct PromptPayload<'a> {
    prompt: &'a str,
    user_id: &'a str,
    conversation_id: Uuid,
}

#[derive(Serialize)]
struct ResponsePayload<'a> {
    response: &'a str,
    context: &'a str,
}

/// Validator that submits traces to an Arthur task.
///
/// A round is two calls: `validate_prompt` returns an `inference_id`, which
/// parameterizes the following `validate_response` call.
pub struct ArthurValidator {
    client: reqwest::Client,
    base_url: Url,
    task_id: String,
    user_id: String,
    token: String,
}

impl ArthurValidator {
    /// Create a validator from settings and a bearer token.
    pub fn new(settings: &ValidationSettings, token: &str) -> Result<Self, ValidationError> {
        let mut base = settings.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(&base)?,
            task_id: settings.task_id.clone(),
            user_id: settings.user_id.clone(),
            token: token.to_string(),
        })
    }

    fn prompt_url(&self) -> Result<Url, ValidationError> {
        Ok(self
            .base_url
            .join(&format!("api/v2/tasks/{}/validate_prompt", self.task_id))?)
    }

    fn response_url(&self, inference_id: &str) -> Result<Url, ValidationError> {
        Ok(self.base_url.join(&format!(
            "api/v2/tasks/{}/validate_response/{}",
            self.task_id, inference_id
        ))?)
    }

    async fn post<T: Serialize>(&self, url: Url, body: &T) -> Result<Value, ValidationError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ValidationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TraceValidator for ArthurValidator {
    #[instrument(skip(self, trace), fields(conversation_id = %trace.conversation_id))]
    async fn validate(&self, trace: &Trace) -> Result<ValidationOutcome, ValidationError> {
        let prompt_payload = PromptPayload {
            prompt: &trace.prompt,
            user_id: &self.user_id,
            conversation_id: trace.conversation_id,
        };
        let prompt_result = self.post(self.prompt_url()?, &prompt_payload).await?;

        let inference_id = prompt_result
            .get("inference_id")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingInferenceId)?
            .to_string();
        info!(inference_id = %inference_id, "Prompt validated");
        debug!("Prompt validation result: {}", prompt_result);

        let response_payload = ResponsePayload {
            response: &trace.response,
            context: &trace.context,
        };
        let response_result = self
            .post(self.response_url(&inference_id)?, &response_payload)
            .await?;
        info!(inference_id = %inference_id, "Response validated");
        debug!("Response validation result: {}", response_result);

        Ok(ValidationOutcome {
            inference_id,
            prompt_result,
            response_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const TASK: &str = "task-123";

    /// What the fake service should answer to `validate_prompt`.
    #[derive(Clone, Copy)]
    enum PromptReply {
        Ok,
        ServerError,
        NoInferenceId,
    }

    struct Fake {
        reply: PromptReply,
        prompts: Mutex<Vec<(Value, Option<String>)>>,
        responses: Mutex<Vec<(String, Value)>>,
    }

    async fn validate_prompt(
        State(fake): State<Arc<Fake>>,
        Path(task): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        assert_eq!(task, TASK);
        let auth = headers
            .get("authorization")
            .map(|v| v.to_str().unwrap().to_string());
        fake.prompts.lock().unwrap().push((body, auth));
        match fake.reply {
            PromptReply::Ok => {
                (StatusCode::OK, Json(json!({"inference_id": "inf-1", "rule_results": []})))
            }
            PromptReply::ServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"})))
            }
            PromptReply::NoInferenceId => (StatusCode::OK, Json(json!({"rule_results": []}))),
        }
    }

    async fn validate_response(
        State(fake): State<Arc<Fake>>,
        Path((_task, inference_id)): Path<(String, String)>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        fake.responses.lock().unwrap().push((inference_id, body));
        Json(json!({"rule_results": []}))
    }

    async fn serve(reply: PromptReply) -> (Arc<Fake>, ArthurValidator) {
        let fake = Arc::new(Fake {
            reply,
            prompts: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/api/v2/tasks/{task}/validate_prompt", post(validate_prompt))
            .route(
                "/api/v2/tasks/{task}/validate_response/{inference_id}",
                post(validate_response),
            )
            .with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let settings = ValidationSettings {
            base_url: format!("http://{}", addr),
            task_id: TASK.to_string(),
            ..ValidationSettings::default()
        };
        let validator = ArthurValidator::new(&settings, "arthur-token").unwrap();
        (fake, validator)
    }

    #[tokio::test]
    async fn test_two_step_round() {
        let (fake, validator) = serve(PromptReply::Ok).await;
        let trace = Trace::new("What about timing?", "Ilan said timing matters.", "Ilan: ...");

        let outcome = validator.validate(&trace).await.unwrap();
        assert_eq!(outcome.inference_id, "inf-1");

        let prompts = fake.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let (body, auth) = &prompts[0];
        assert_eq!(body["prompt"], "What about timing?");
        assert_eq!(body["user_id"], "test-user");
        assert_eq!(body["conversation_id"], trace.conversation_id.to_string());
        assert_eq!(auth.as_deref(), Some("Bearer arthur-token"));

        let responses = fake.responses.lock().unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].0, "inf-1");
        assert_eq!(responses[0].1["response"], "Ilan said timing matters.");
        assert_eq!(responses[0].1["context"], "Ilan: ...");
    }

    #[tokio::test]
    async fn test_server_error_skips_second_call() {
        let (fake, validator) = serve(PromptReply::ServerError).await;

        let err = validator
            .validate(&Trace::new("q", "a", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::Status { status: 500, .. }));
        assert!(fake.responses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_inference_id_skips_second_call() {
        let (fake, validator) = serve(PromptReply::NoInferenceId).await;

        let err = validator
            .validate(&Trace::new("q", "a", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingInferenceId));
        assert!(fake.responses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let settings = ValidationSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            ..ValidationSettings::default()
        };
        let validator = ArthurValidator::new(&settings, "t").unwrap();
        let err = validator
            .validate(&Trace::new("q", "a", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::Http(_)));
    }

    #[test]
    fn test_endpoint_urls() {
        let settings = ValidationSettings {
            base_url: "http://localhost:3030".to_string(),
            task_id: "abc".to_string(),
            ..ValidationSettings::default()
        };
        let validator = ArthurValidator::new(&settings, "t").unwrap();
        assert_eq!(
            validator.prompt_url().unwrap().as_str(),
            "http://localhost:3030/api/v2/tasks/abc/validate_prompt"
        );
        assert_eq!(
            validator.response_url("inf-9").unwrap().as_str(),
            "http://localhost:3030/api/v2/tasks/abc/validate_response/inf-9"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = ValidationSettings {
            base_url: "not a url".to_string(),
            ..ValidationSettings::default()
        };
        assert!(matches!(
            ArthurValidator::new(&settings, "t"),
            Err(ValidationError::Url(_))
        ));
    }
}

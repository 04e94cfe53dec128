//! OpenAI client configuration.

use crate::config::OpenAISettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use backoff::ExponentialBackoff;
use std::time::Duration;

/// Shared client type for embeddings and chat completions.
pub type OpenAIClient = Client<OpenAIConfig>;

/// Backoff policy that gives up on the first failure.
///
/// Rate-limit and server errors reach the caller immediately instead of being
/// retried inside the client.
fn no_retry() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..ExponentialBackoff::default()
    }
}

/// Create an OpenAI client from settings and an API key.
///
/// The returned handle is cheap to clone; one instance is built at startup and
/// shared between the embedder and the answer generator.
pub fn create_client(settings: &OpenAISettings, api_key: &str) -> Result<OpenAIClient> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;

    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = &settings.api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config)
        .with_http_client(http_client)
        .with_backoff(no_retry()))
}

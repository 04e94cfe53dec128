//! Answer generation through a hosted chat model.

use crate::error::{PodragError, Result};
use crate::openai::OpenAIClient;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Trait for answer generators.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`, returning trimmed text.
    async fn generate(&self, prompt: &str, model: &str, temperature: f32) -> Result<String>;
}

/// Chat-completions generator sending the prompt as a single user message.
pub struct OpenAIGenerator {
    client: OpenAIClient,
}

impl OpenAIGenerator {
    pub fn new(client: OpenAIClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, model: &str, temperature: f32) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PodragError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .temperature(temperature)
            .build()
            .map_err(|e| PodragError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PodragError::Generation(format!("Chat API error: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| PodragError::Generation("Empty response from LLM".to_string()))?
            .trim()
            .to_string();

        debug!("Generated answer of {} chars", answer.len());
        Ok(answer)
    }
}

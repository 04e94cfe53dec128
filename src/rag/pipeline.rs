//! The question-answering pipeline.

use super::context::{format_context, format_sources};
use super::generator::Generator;
use super::prompt::build_prompt;
use crate::config::{Prompts, RagSettings, ValidationMode};
use crate::embedding::Embedder;
use crate::error::{PodragError, Result};
use crate::validation::{Trace, TraceValidator};
use crate::vector_index::{Match, VectorIndex};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Per-request knobs for [`RagPipeline::answer_query_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub top_k: usize,
    pub model: String,
    pub temperature: f32,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            model: "gpt-4o".to_string(),
            temperature: 0.7,
        }
    }
}

impl From<&RagSettings> for QueryOptions {
    fn from(settings: &RagSettings) -> Self {
        Self {
            top_k: settings.top_k,
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }
}

/// An answer together with the context it was grounded on.
#[derive(Debug, Clone)]
pub struct RagAnswer {
    /// Generated answer, trimmed.
    pub answer: String,
    /// Context block sent to the model.
    pub context: String,
    /// Markdown bullet rendering of the same matches.
    pub sources: String,
    /// The retrieved matches in ranking order.
    pub matches: Vec<Match>,
}

/// Embed → retrieve → prompt → generate → validate.
///
/// All collaborators are injected; the pipeline keeps no per-request state.
pub struct RagPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn Generator>,
    validator: Option<Arc<dyn TraceValidator>>,
    validation_mode: ValidationMode,
    template: String,
    defaults: QueryOptions,
}

impl RagPipeline {
    /// Create a pipeline with the default prompt and no validator.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
            validator: None,
            validation_mode: ValidationMode::default(),
            template: Prompts::default().rag.user,
            defaults: QueryOptions::default(),
        }
    }

    /// Attach a trace validator.
    pub fn with_validator(mut self, validator: Arc<dyn TraceValidator>, mode: ValidationMode) -> Self {
        self.validator = Some(validator);
        self.validation_mode = mode;
        self
    }

    /// Use custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.template = prompts.rag.user;
        self
    }

    /// Set the options used by [`answer_query`](Self::answer_query).
    pub fn with_defaults(mut self, defaults: QueryOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Default query options.
    pub fn defaults(&self) -> &QueryOptions {
        &self.defaults
    }

    /// Embed `query` and fetch up to `top_k` matches.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Match>> {
        if top_k == 0 {
            return Err(PodragError::InvalidInput("top_k must be greater than zero".to_string()));
        }

        let embedding = self.embedder.embed(query).await?;
        let matches = self.index.query(&embedding, top_k).await?;
        debug!("Retrieved {} matches", matches.len());
        Ok(matches)
    }

    /// Answer a question with the pipeline's default options.
    pub async fn answer_query(&self, query: &str) -> Result<RagAnswer> {
        self.answer_query_with(query, &self.defaults).await
    }

    /// Answer a question.
    ///
    /// Embedding, retrieval and generation errors are returned as-is. Trace
    /// validation runs afterwards and cannot fail the call.
    #[instrument(skip(self, options), fields(top_k = options.top_k, model = %options.model))]
    pub async fn answer_query_with(&self, query: &str, options: &QueryOptions) -> Result<RagAnswer> {
        info!("Processing question: {}", query);

        let matches = self.retrieve(query, options.top_k).await?;
        let context = format_context(&matches);
        let prompt = build_prompt(&self.template, &context, query);

        let answer = self
            .generator
            .generate(&prompt, &options.model, options.temperature)
            .await?;

        self.submit_trace(Trace::new(query, answer.as_str(), context.as_str()))
            .await;

        Ok(RagAnswer {
            answer,
            sources: format_sources(&matches),
            context,
            matches,
        })
    }

    async fn submit_trace(&self, trace: Trace) {
        let Some(validator) = &self.validator else {
            return;
        };

        match self.validation_mode {
            ValidationMode::Inline => run_validation(validator.as_ref(), &trace).await,
            ValidationMode::Detached => {
                let validator = Arc::clone(validator);
                tokio::spawn(async move {
                    run_validation(validator.as_ref(), &trace).await;
                });
            }
        }
    }
}

async fn run_validation(validator: &dyn TraceValidator, trace: &Trace) {
    match validator.validate(trace).await {
        Ok(outcome) => info!(inference_id = %outcome.inference_id, "Trace validated"),
        Err(e) => warn!(conversation_id = %trace.conversation_id, "Trace validation failed: {}", e),
    }
}

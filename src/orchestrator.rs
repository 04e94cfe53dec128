//! Startup wiring for podrag.
//!
//! Builds the process-wide client handles once and assembles them into a
//! [`RagPipeline`].

use crate::config::{IndexProvider, Prompts, Requirements, Secrets, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{PodragError, Result};
use crate::openai::create_client;
use crate::rag::{Generator, OpenAIGenerator, QueryOptions, RagPipeline};
use crate::validation::{ArthurValidator, TraceValidator};
use crate::vector_index::{MemoryIndex, PineconeIndex, VectorIndex};
use std::sync::Arc;
use tracing::info;

/// Owns the configured pipeline for the lifetime of the process.
pub struct Orchestrator {
    settings: Settings,
    pipeline: Arc<RagPipeline>,
}

impl Orchestrator {
    /// Build the pipeline using credentials from the environment.
    pub async fn new(settings: Settings) -> Result<Self> {
        let secrets = Secrets::from_env(Self::requirements(&settings))?;
        Self::with_secrets(settings, &secrets).await
    }

    /// Build the pipeline with explicit credentials.
    pub async fn with_secrets(settings: Settings, secrets: &Secrets) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let client = create_client(&settings.openai, &secrets.openai_api_key)?;
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
            client.clone(),
            &settings.openai.embedding_model,
            settings.openai.embedding_dimensions,
        ));
        let generator: Arc<dyn Generator> = Arc::new(OpenAIGenerator::new(client));
        let index = Self::open_index(&settings, secrets).await?;

        let mut pipeline = RagPipeline::new(embedder, index, generator)
            .with_prompts(prompts)
            .with_defaults(QueryOptions::from(&settings.rag));

        if settings.validation.enabled {
            let token = secrets.arthur_api_key.as_deref().ok_or_else(|| {
                PodragError::Config("Validation is enabled but no token was provided".to_string())
            })?;
            let validator: Arc<dyn TraceValidator> = Arc::new(
                ArthurValidator::new(&settings.validation, token)
                    .map_err(|e| PodragError::Config(e.to_string()))?,
            );
            info!(
                "Trace validation enabled ({}, {:?})",
                settings.validation.base_url, settings.validation.mode
            );
            pipeline = pipeline.with_validator(validator, settings.validation.mode);
        }

        Ok(Self {
            settings,
            pipeline: Arc::new(pipeline),
        })
    }

    /// Credentials required by the given configuration.
    pub fn requirements(settings: &Settings) -> Requirements {
        Requirements {
            index: settings.index.provider == IndexProvider::Pinecone,
            validation: settings.validation.enabled,
        }
    }

    async fn open_index(settings: &Settings, secrets: &Secrets) -> Result<Arc<dyn VectorIndex>> {
        match settings.index.provider {
            IndexProvider::Pinecone => {
                let api_key = secrets.pinecone_api_key.as_deref().ok_or_else(|| {
                    PodragError::Config("Pinecone index requires an API key".to_string())
                })?;
                let index = match &settings.index.host {
                    Some(host) => PineconeIndex::new(api_key, host),
                    None => PineconeIndex::connect(api_key, &settings.index.name).await?,
                };
                info!("Using Pinecone index '{}' at {}", settings.index.name, index.base_url());
                Ok(Arc::new(
                    index.with_namespace(settings.index.namespace.clone()),
                ))
            }
            IndexProvider::Memory => {
                let path = settings.memory_index_path();
                Ok(Arc::new(MemoryIndex::load(&path)?))
            }
        }
    }

    /// The shared pipeline handle.
    pub fn pipeline(&self) -> Arc<RagPipeline> {
        Arc::clone(&self.pipeline)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

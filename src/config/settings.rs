//! Configuration settings for podrag.

use crate::error::{PodragError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub openai: OpenAISettings,
    pub index: IndexSettings,
    pub rag: RagSettings,
    pub validation: ValidationSettings,
    pub prompts: PromptSettings,
    pub server: ServerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Settings for the embedding and chat client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Embedding model used for queries.
    pub embedding_model: String,
    /// Optional embedding dimensions. Must match the index when set.
    pub embedding_dimensions: Option<u32>,
    /// Override for the API base URL.
    pub api_base: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: None,
            api_base: None,
            timeout_secs: 300,
        }
    }
}

/// Vector index provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum IndexProvider {
    /// Hosted Pinecone index (default).
    #[default]
    Pinecone,
    /// In-process index loaded from a JSON file.
    Memory,
}

impl std::str::FromStr for IndexProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pinecone" => Ok(IndexProvider::Pinecone),
            "memory" => Ok(IndexProvider::Memory),
            _ => Err(format!("Unknown index provider: {}", s)),
        }
    }
}

impl std::fmt::Display for IndexProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexProvider::Pinecone => write!(f, "pinecone"),
            IndexProvider::Memory => write!(f, "memory"),
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Index provider (pinecone, memory).
    pub provider: IndexProvider,
    /// Pinecone index name.
    pub name: String,
    /// Pinecone data-plane host. Resolved from `name` when unset.
    pub host: Option<String>,
    /// Pinecone namespace.
    pub namespace: Option<String>,
    /// Path to the JSON records file (for the memory provider).
    pub memory_path: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            provider: IndexProvider::Pinecone,
            name: "podcastrag2".to_string(),
            host: None,
            namespace: None,
            memory_path: "~/.podrag/index.json".to_string(),
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Number of transcript chunks to retrieve.
    pub top_k: usize,
    /// Chat model for answer generation.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            model: "gpt-4o".to_string(),
            temperature: 0.7,
        }
    }
}

/// How trace validation is scheduled relative to the answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Run on a background task; the answer returns immediately.
    #[default]
    Detached,
    /// Await validation before returning. Errors are still swallowed.
    Inline,
}

/// Trace validation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Send traces to the validation service.
    pub enabled: bool,
    /// Scheduling mode.
    pub mode: ValidationMode,
    /// Base URL of the validation service.
    pub base_url: String,
    /// Task the prompts and responses are validated against.
    pub task_id: String,
    /// Placeholder user identifier sent with each prompt.
    pub user_id: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: ValidationMode::Detached,
            base_url: "http://localhost:3030".to_string(),
            task_id: "022bd0ba-366f-41f4-9bb0-cac09910b650".to_string(),
            user_id: "test-user".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PodragError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("podrag")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded memory index path.
    pub fn memory_index_path(&self) -> PathBuf {
        Self::expand_path(&self.index.memory_path)
    }
}

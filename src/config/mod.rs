//! Configuration module for podrag.
//!
//! Handles loading application settings, prompt templates and credentials.

mod prompts;
mod secrets;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use secrets::{Requirements, Secrets, ARTHUR_API_KEY, OPENAI_API_KEY, PINECONE_API_KEY};
pub use settings::{
    GeneralSettings, IndexProvider, IndexSettings, OpenAISettings, PromptSettings, RagSettings,
    ServerSettings, Settings, ValidationMode, ValidationSettings,
};

//! Credentials supplied through the environment.

use crate::error::{PodragError, Result};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const ARTHUR_API_KEY: &str = "ARTHUR_API_KEY";

/// Which credentials a command needs before it can start.
#[derive(Debug, Clone, Copy, Default)]
pub struct Requirements {
    pub index: bool,
    pub validation: bool,
}

/// API credentials read once at startup.
#[derive(Clone, Default)]
pub struct Secrets {
    pub openai_api_key: String,
    pub pinecone_api_key: Option<String>,
    pub arthur_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &"<redacted>")
            .field("pinecone_api_key", &self.pinecone_api_key.as_ref().map(|_| "<redacted>"))
            .field("arthur_api_key", &self.arthur_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Secrets {
    /// Read credentials from the process environment.
    pub fn from_env(req: Requirements) -> Result<Self> {
        Self::from_lookup(req, |name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup function.
    pub fn from_lookup<F>(req: Requirements, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = required(&lookup, OPENAI_API_KEY)?;
        let pinecone_api_key = if req.index {
            Some(required(&lookup, PINECONE_API_KEY)?)
        } else {
            None
        };
        let arthur_api_key = if req.validation {
            Some(required(&lookup, ARTHUR_API_KEY)?)
        } else {
            None
        };

        Ok(Self {
            openai_api_key,
            pinecone_api_key,
            arthur_api_key,
        })
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(PodragError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            name, name
        ))),
        None => Err(PodragError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}

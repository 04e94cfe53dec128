//! podrag - a retrieval-augmented chatbot over podcast transcripts
//!
//! Answers questions about the "Zero to One" podcast from its transcripts,
//! naming the speakers behind every statement.
//!
//! # Overview
//!
//! Each question runs through a fixed pipeline:
//!
//! 1. the question is embedded with a hosted embedding model,
//! 2. the embedding is matched against a vector index of transcript chunks,
//! 3. the matches become a speaker-attributed context block inside a prompt,
//! 4. a hosted chat model answers the prompt,
//! 5. the exchange is sent to a hallucination-detection service on a
//!    best-effort basis.
//!
//! # Architecture
//!
//! - `config` - Settings, prompt templates and credentials
//! - `embedding` - Query embedding
//! - `vector_index` - Vector index abstraction (Pinecone, in-memory)
//! - `rag` - Context formatting, prompt building, generation and the pipeline
//! - `validation` - Trace validation against an Arthur task
//! - `orchestrator` - Startup wiring
//! - `cli` - Command-line and HTTP front ends
//!
//! # Example
//!
//! ```rust,no_run
//! use podrag::config::Settings;
//! use podrag::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings).await?;
//!
//!     let result = orchestrator
//!         .pipeline()
//!         .answer_query("What does Ilan say about timing?")
//!         .await?;
//!     println!("{}\n\n{}", result.answer, result.sources);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod validation;
pub mod vector_index;

pub use error::{PodragError, Result, Stage};

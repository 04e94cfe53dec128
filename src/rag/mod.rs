//! RAG (Retrieval-Augmented Generation) over podcast transcripts.
//!
//! Answers questions from the transcript index, attributing statements to the
//! speakers who made them.

pub mod context;
mod generator;
mod pipeline;
pub mod prompt;

pub use context::{format_context, format_sources};
pub use generator::{Generator, OpenAIGenerator};
pub use pipeline::{QueryOptions, RagAnswer, RagPipeline};
pub use prompt::build_prompt;

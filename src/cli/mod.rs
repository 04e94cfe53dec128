//! CLI module for podrag.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// podrag - ask questions about the Zero to One podcast
///
/// Answers are grounded on transcript excerpts retrieved from a vector index
/// and attributed to the speakers who said them.
#[derive(Parser, Debug)]
#[command(name = "podrag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PODRAG_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question and get an answer from the podcast transcripts
    Ask {
        /// The question to ask
        question: String,

        /// Chat model to use for the answer
        #[arg(short, long)]
        model: Option<String>,

        /// Number of transcript excerpts to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Hide the source excerpts
        #[arg(long)]
        no_sources: bool,
    },

    /// Show the transcript excerpts closest to a query
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Start the web chatbot and JSON API
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}

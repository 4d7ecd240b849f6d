//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for gnsearch_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => gnsearch_domain::OutputFormat::Text,
            OutputFormat::Json => gnsearch_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for gnsearch
#[derive(Parser, Debug)]
#[command(name = "gnsearch")]
#[command(author, version, about = "Question answering over GeneNetwork data")]
#[command(long_about = r#"
gnsearch answers genetics questions from the GeneNetwork RDF corpus.

`ask` runs the supervised pipeline: a planner splits the question into steps,
a researcher searches the corpus for each step, an expert calls NCBI and
SPARQL tools, a critic suggests follow-ups, and a finalizer writes the answer
from the findings that hold up.

`search` is a single retrieval-augmented answer without agents.

Configuration files are loaded from (in priority order):
1. GNSEARCH_<SECTION>__<KEY>   Environment variables
2. --config <path>             Explicit config file
3. ./gnsearch.toml             Project-level config
4. ~/.config/gnsearch/config.toml   Global config

Example:
  gnsearch ask "Which QTLs on chromosome 4 affect hippocampus weight in BXD mice?"
  gnsearch search "What is the BXD family?" --output json
  gnsearch schema
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (defaults to the configured format, else text)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to daily rolling files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Append the conversation transcript (JSONL) to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub conversation_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Answer a question with the supervised agent pipeline
    Ask {
        /// The question to answer
        query: String,
    },
    /// Answer a question with a single retrieval-augmented generation call
    Search {
        /// The question to answer
        query: String,
    },
    /// Print the prefixes and predicates extracted from the schema files
    Schema,
}

//! Configuration file loading for gnsearch
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `GNSEARCH_<SECTION>__<KEY>` (e.g. `GNSEARCH_LLM__API_KEY`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./gnsearch.toml` or `./.gnsearch.toml`
//! 4. Global: `$XDG_CONFIG_HOME/gnsearch/config.toml` (or `~/.config/gnsearch/config.toml`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentConfig, FileConfig, FileCorpusConfig, FileEmbeddingConfig,
    FileLlmConfig, FileOutputConfig, FileRetrievalConfig, FileSchemaConfig,
    FileToolsConfig,
};
pub use loader::ConfigLoader;

//! LLM provider adapters
//!
//! Implementations of the [`LlmGateway`](gnsearch_application::LlmGateway)
//! and [`Embedder`](gnsearch_application::Embedder) ports.

pub mod openai;

pub use openai::{OpenAiEmbedder, OpenAiGateway};

//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_progress;
pub mod conversation_logger;
pub mod embedder;
pub mod llm_gateway;
pub mod retriever;
pub mod schema_source;
pub mod tool_executor;

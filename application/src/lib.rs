//! Application layer for gnsearch
//!
//! Use cases, port definitions, and application configuration. Depends only
//! on the domain layer; every external capability (text completion,
//! retrieval indexes, embeddings, tools, schema files) is reached through a
//! port implemented in infrastructure.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{ExecutionParams, RetrievalParams, SearchConfig};
pub use ports::{
    agent_progress::{AgentProgressNotifier, NoAgentProgress},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    embedder::{Embedder, EmbeddingError},
    llm_gateway::{CompletionError, LlmGateway},
    retriever::{RetrievalError, Retriever},
    schema_source::{SchemaSource, SchemaSourceError},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::agents::{
    AgentContext, AgentStep, Agents, CriticAgent, ExpertAgent, ExpertOutcome, FinalizerAgent,
    PlannerAgent, ResearcherAgent, StepEffect, StepOutcome,
};
pub use use_cases::answer_query::{AnswerError, AnswerQueryUseCase};
pub use use_cases::hybrid_search::{HybridSearch, HybridSearchError};
pub use use_cases::query_router::{QueryRouter, RoutedQuery};
pub use use_cases::reason_act::{LoopError, LoopOutcome, ReasonActLoop};
pub use use_cases::schema_translator::{SchemaTranslator, TranslationError};
pub use use_cases::search::{SearchError, SearchOutput, SearchUseCase};
pub use use_cases::shared::{CallError, Cancelled};
pub use use_cases::supervisor::{Supervisor, SupervisorError};

//! Domain layer for gnsearch
//!
//! Pure types and algorithms with no I/O: retrieval fusion, the tool schema
//! and its validation, the agent entities the supervisor works with, RDF
//! schema vocabulary, prompt templates and response parsing.
//!
//! # Core Concepts
//!
//! ## Hybrid retrieval
//!
//! A lexical and a semantic retriever each produce a [`RankedList`];
//! [`fuse`] merges them with [`FusionWeight`]s chosen from the query's
//! [`SearchKind`].
//!
//! ## Supervised answering
//!
//! A [`Plan`] is worked through by researcher, expert and critic agents
//! under the [`SupervisorState`] machine. Each step yields a [`Finding`];
//! only the satisfied prefix of findings feeds the [`FinalAnswer`].

pub mod agent;
pub mod answer;
pub mod core;
pub mod prompt;
pub mod retrieval;
pub mod schema;
pub mod tool;

pub use agent::{
    AgentMessage, AgentRole, ConversationHistory, Finding, FindingKind, LoopAction, LoopTrace,
    NO_EVIDENCE, Plan, PlanStep, StateMachine, SupervisorState, TraceEntry, chain_satisfied,
    parse_action, parse_plan, parse_route, parse_yes_no, satisfied_prefix_len,
};
pub use answer::{AnswerStatus, FinalAnswer, Information, SearchAnswer, parse_search_answer};
pub use core::{
    error::DomainError,
    output_format::OutputFormat,
    query::{DEFAULT_MAX_QUERY_LENGTH, Query},
};
pub use prompt::{CompletionRequest, PromptTemplate, ResponseFormat};
pub use retrieval::{
    Document, DocumentId, FusionError, FusionWeight, RankedList, RetrievalSource, RetrievedItem,
    SearchKind, fuse, parse_search_kind,
};
pub use schema::{NAMESPACES, SchemaError, SchemaVocabulary, expand_prefixed, extract_structured_query};
pub use tool::{
    DefaultToolValidator, ParamType, ProviderError, ToolCall, ToolDefinition, ToolError,
    ToolParameter, ToolProvider, ToolResult, ToolSpec, ToolValidator,
};

//! Tool domain module
//!
//! Tools are the expert agent's way of reaching outside the corpus: NCBI
//! record lookups and structured queries against the RDF store. Every tool is
//! declared by a [`ToolDefinition`], invoked through a [`ToolCall`] and
//! answered with a [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (schema)     │    │ (validated)  │    │ (payload or  │
//! └──────┬───────┘    └──────────────┘    │  error)      │
//!        │                                └──────────────┘
//!        ├─ aliases: "sparql" → "fetch_data"
//!        └─ tools:   "fetch_data" → ToolDefinition
//! ```
//!
//! Models frequently invent near-miss tool names; [`ToolSpec::resolve`]
//! maps known aliases to canonical names before validation.
//! [`ToolValidator::prepare`] then checks required arguments and loose
//! types, and fills in declared defaults.

pub mod entities;
pub mod provider;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use provider::{ProviderError, ToolProvider};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult};

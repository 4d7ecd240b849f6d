//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agents;
pub mod answer_query;
pub mod hybrid_search;
pub mod query_router;
pub mod reason_act;
pub mod schema_translator;
pub mod search;
pub mod shared;
pub mod supervisor;

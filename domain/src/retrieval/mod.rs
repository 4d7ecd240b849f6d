//! Retrieval domain module
//!
//! Pure types and algorithms for **hybrid retrieval**: combining a lexical
//! (term-overlap) ranking and a semantic (vector-similarity) ranking of the
//! same corpus into one list.
//!
//! ```text
//! ┌────────────┐   RankedList (lexical)  ┐
//! │ Retriever  │──────────────────────────┤    ┌──────────┐    ┌────────────┐
//! └────────────┘                          ├───▶│  fuse()  │───▶│ RankedList │
//! ┌────────────┐   RankedList (semantic) ┘    └──────────┘    │  (top_k)   │
//! │ Retriever  │─────────────────────────      ▲               └────────────┘
//! └────────────┘                               │
//!                                     FusionWeight (router)
//! ```
//!
//! # Key Types
//!
//! - [`Document`]: an indexed text with an opaque id
//! - [`RetrievedItem`] / [`RankedList`]: one retriever's output for one query
//! - [`FusionWeight`]: lexical/semantic weights, always summing to 1
//! - [`SearchKind`]: advisory classification used to pick the weights
//! - [`fuse`]: weighted min-max score fusion

pub mod entities;
pub mod fusion;
pub mod search_kind;
pub mod weights;

pub use entities::{Document, DocumentId, RankedList, RetrievalSource, RetrievedItem};
pub use fusion::{FusionError, fuse};
pub use search_kind::{SearchKind, parse_search_kind};
pub use weights::FusionWeight;

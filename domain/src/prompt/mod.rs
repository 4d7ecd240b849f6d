//! Prompt domain
//!
//! Every completion call site has its own [`CompletionRequest`] built by
//! [`PromptTemplate`]; the matching response parser lives next to the
//! entity it produces.

pub mod request;
mod template;

pub use request::{CompletionRequest, ResponseFormat};
pub use template::PromptTemplate;

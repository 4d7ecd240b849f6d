//! Answers returned at the boundary

pub mod final_answer;
pub mod search_answer;

pub use final_answer::{AnswerStatus, FinalAnswer};
pub use search_answer::{Information, SearchAnswer, parse_search_answer};

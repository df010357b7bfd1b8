//! Prompt construction and defensive parsing for the generative collaborator.
//!
//! The completion server itself is external; this module only builds prompts and
//! validates or repairs what comes back.

pub mod answer;
pub mod questions;
pub mod summary;

use crate::terms::context::prefix_chars;

/// Document chars included in summary and question prompts.
pub const PROMPT_EXCERPT_CHARS: usize = 4_000;

pub(crate) fn document_excerpt(text: &str, limit: usize) -> &str {
    prefix_chars(text, limit)
}

pub use answer::{build_answer_prompt, ANSWER_FAILED, ANSWER_UNAVAILABLE};
pub use questions::{build_questions_prompt, fallback_questions, parse_generated_questions};
pub use summary::{build_summary_prompt, fallback_summary, parse_summary_sections, validate_summary, SummarySection};

//! # Clause Engine
//!
//! Deterministic, rule-based clause analysis with no model dependency.
//!
//! ## Components
//! - `doc_type`: coarse document category from keyword groups
//! - `segmenter`: multi-strategy clause segmentation
//! - `taxonomy`: weighted-keyword clause-type classifier
//! - `risk`: tiered keyword risk assessment
//! - `questions`: per-type suggested questions and explanations
//! - `clause`: output data structures
//! - `analyzer`: main orchestrator

pub mod analyzer;
pub mod clause;
pub mod doc_type;
pub mod questions;
pub mod risk;
pub mod segmenter;
pub mod taxonomy;

pub use analyzer::ClauseAnalyzer;
pub use clause::{Clause, ClauseType, RiskCategory};
pub use doc_type::{detect_document_type, DocumentType};
pub use segmenter::split_into_clauses;

//! Clause Analyzer - orchestrates segmentation, classification and risk scoring.
//!
//! Nothing here returns an error. A panic while segmenting degrades the whole document
//! to one fallback clause; a panic while scoring one clause degrades only that clause.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{error, info, warn};

use super::clause::{Clause, ClauseType, RiskCategory};
use super::questions::{explanation_for, questions_for_type};
use super::risk;
use super::segmenter::{self, MAX_CLAUSES};
use super::taxonomy;
use crate::terms::context::prefix_chars;

const CLAUSE_TEXT_LIMIT: usize = 500;
const DEGRADED_CLAUSE_PREFIX: usize = 200;

const DEGRADED_EXPLANATION: &str = "This clause requires manual review due to processing limitations.";
const DEGRADED_QUESTIONS: [&str; 2] = ["What does this clause mean?", "How does this affect me?"];

const DOCUMENT_FALLBACK_EXPLANATION: &str = "This document contains legal terms that should be reviewed carefully with attention to obligations, deadlines, and potential penalties.";
const DOCUMENT_FALLBACK_QUESTIONS: [&str; 2] = [
    "What are the main obligations in this document?",
    "Are there any important deadlines or penalties?",
];

/// Turns raw document text into classified, risk-scored clauses.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClauseAnalyzer;

impl ClauseAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classifies one clause string. Deterministic for a given input.
    pub fn classify_clause(&self, clause: &str) -> Clause {
        let classification = taxonomy::classify(clause);
        let assessment = risk::assess(clause);

        Clause {
            text: clip_with_ellipsis(clause, CLAUSE_TEXT_LIMIT),
            clause_type: classification.clause_type,
            confidence: classification.confidence,
            risk_score: assessment.score,
            risk_category: assessment.category,
            explanation: explanation_for(classification.clause_type, assessment.category),
            suggested_questions: to_owned_questions(questions_for_type(classification.clause_type)),
        }
    }

    /// Segments `text` and classifies at most the first ten clauses.
    ///
    /// Always returns at least one clause.
    pub fn classify_document(&self, text: &str) -> Vec<Clause> {
        self.classify_document_with(text, |clause| self.classify_clause(clause))
    }

    /// [`classify_document`](Self::classify_document) with a caller-supplied per-clause step.
    pub(crate) fn classify_document_with<F>(&self, text: &str, classify: F) -> Vec<Clause>
    where
        F: Fn(&str) -> Clause,
    {
        let start = Instant::now();

        let segments = match panic::catch_unwind(|| segmenter::split_into_clauses(text)) {
            Ok(segments) => segments,
            Err(_) => {
                error!("Clause segmentation panicked, using document fallback");
                return document_fallback(text);
            }
        };

        let to_process = &segments[..segments.len().min(MAX_CLAUSES)];
        info!(clauses = to_process.len(), "Classifying clauses");

        let classified: Vec<Clause> = to_process
            .iter()
            .enumerate()
            .map(|(i, clause)| match panic::catch_unwind(AssertUnwindSafe(|| classify(clause))) {
                Ok(result) => result,
                Err(_) => {
                    warn!(clause_index = i + 1, "Clause classification failed, degrading clause");
                    degraded_clause(clause)
                }
            })
            .collect();

        info!(
            clauses = classified.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Classification complete"
        );

        if classified.is_empty() {
            document_fallback(text)
        } else {
            classified
        }
    }
}

fn clip_with_ellipsis(text: &str, limit: usize) -> String {
    let prefix = prefix_chars(text, limit);
    if prefix.len() < text.len() {
        format!("{}...", prefix)
    } else {
        prefix.to_string()
    }
}

fn to_owned_questions(questions: [&str; 2]) -> Vec<String> {
    questions.iter().map(|q| q.to_string()).collect()
}

/// Record used for a clause whose scoring failed.
pub fn degraded_clause(clause: &str) -> Clause {
    Clause {
        text: format!("{}...", prefix_chars(clause, DEGRADED_CLAUSE_PREFIX)),
        clause_type: ClauseType::General,
        confidence: 0.3,
        risk_score: 2,
        risk_category: RiskCategory::Medium,
        explanation: DEGRADED_EXPLANATION.to_string(),
        suggested_questions: to_owned_questions(DEGRADED_QUESTIONS),
    }
}

/// Single-clause result used when the document cannot be segmented.
pub fn document_fallback(text: &str) -> Vec<Clause> {
    vec![Clause {
        text: format!("{}...", prefix_chars(text, segmenter::FALLBACK_PREFIX_LEN)),
        clause_type: ClauseType::General,
        confidence: 0.5,
        risk_score: 2,
        risk_category: RiskCategory::Medium,
        explanation: DOCUMENT_FALLBACK_EXPLANATION.to_string(),
        suggested_questions: to_owned_questions(DOCUMENT_FALLBACK_QUESTIONS),
    }]
}

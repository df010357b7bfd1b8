use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{Clause, DocumentType};
use crate::generative::summary::SummarySection;
use crate::terms::KeyTerms;

/// Result of language detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLanguage {
    /// ISO 639-1 code, e.g. "en".
    pub code: String,
    /// Detector confidence between 0.0 and 1.0.
    pub confidence: f32,
}

impl DetectedLanguage {
    pub fn new(code: &str, confidence: f32) -> Self {
        Self {
            code: code.to_string(),
            confidence,
        }
    }
}

/// Which path produced the report summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarySource {
    /// The completion server returned a structured summary.
    Generated,
    /// Built locally from the extracted terms and clauses.
    Fallback,
}

/// Which path produced the suggested document questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Generated,
    Fallback,
}

/// The full analysis of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    /// Unique report identifier (UUID v4).
    pub id: String,
    pub file_name: Option<String>,
    pub document_type: DocumentType,
    pub language: DetectedLanguage,
    pub clauses: Vec<Clause>,
    pub key_terms: KeyTerms,
    /// Markdown summary with `## ` section headings.
    pub summary: String,
    pub summary_sections: Vec<SummarySection>,
    pub summary_source: SummarySource,
    pub questions: Vec<String>,
    pub question_source: QuestionSource,
    pub text_length: usize,
    pub processed_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}

impl DocumentReport {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Highest clause risk score in the report, if any clause was produced.
    pub fn max_risk_score(&self) -> Option<u8> {
        self.clauses.iter().map(|c| c.risk_score).max()
    }
}

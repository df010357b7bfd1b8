//! Clause value types produced by the analyzer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clause category assigned by the taxonomy classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseType {
    Termination,
    Payment,
    Penalty,
    Renewal,
    Liability,
    Confidentiality,
    Warranty,
    Insurance,
    Maintenance,
    Use,
    Notice,
    Assignment,
    Collateral,
    Interest,
    /// Loan default (failure to pay, acceleration).
    Default,
    Repayment,
    /// No keyword of any other type matched.
    General,
}

impl ClauseType {
    pub fn label(&self) -> &'static str {
        match self {
            ClauseType::Termination => "termination",
            ClauseType::Payment => "payment",
            ClauseType::Penalty => "penalty",
            ClauseType::Renewal => "renewal",
            ClauseType::Liability => "liability",
            ClauseType::Confidentiality => "confidentiality",
            ClauseType::Warranty => "warranty",
            ClauseType::Insurance => "insurance",
            ClauseType::Maintenance => "maintenance",
            ClauseType::Use => "use",
            ClauseType::Notice => "notice",
            ClauseType::Assignment => "assignment",
            ClauseType::Collateral => "collateral",
            ClauseType::Interest => "interest",
            ClauseType::Default => "default",
            ClauseType::Repayment => "repayment",
            ClauseType::General => "general",
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Coarse risk bucket, derived independently of the clause type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
        };
        write!(f, "{}", label)
    }
}

/// A typed, risk-scored span of document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    /// Clause text, at most 500 characters plus an ellipsis.
    pub text: String,
    #[serde(rename = "type")]
    pub clause_type: ClauseType,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    /// Risk score in `1..=5`.
    pub risk_score: u8,
    pub risk_category: RiskCategory,
    pub explanation: String,
    /// Always exactly two questions.
    pub suggested_questions: Vec<String>,
}

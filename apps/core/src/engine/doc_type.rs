//! Coarse document category from sequential keyword groups.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Lease,
    Loan,
    Employment,
    Service,
    Purchase,
    Partnership,
    License,
    Nda,
    General,
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Lease => "lease",
            DocumentType::Loan => "loan",
            DocumentType::Employment => "employment",
            DocumentType::Service => "service",
            DocumentType::Purchase => "purchase",
            DocumentType::Partnership => "partnership",
            DocumentType::License => "license",
            DocumentType::Nda => "nda",
            DocumentType::General => "general",
        }
    }

    /// Human-readable name used in rendered summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Lease => "Lease / Rental Agreement",
            DocumentType::Loan => "Loan Agreement",
            DocumentType::Employment => "Employment Agreement",
            DocumentType::Service => "Service Agreement",
            DocumentType::Purchase => "Purchase / Sale Agreement",
            DocumentType::Partnership => "Partnership Agreement",
            DocumentType::License => "License Agreement",
            DocumentType::Nda => "Non-Disclosure Agreement",
            DocumentType::General => "Legal Document",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Checked in order; the first group with any hit decides.
static DOCUMENT_TYPE_GROUPS: &[(DocumentType, &[&str])] = &[
    (DocumentType::Lease, &["lease", "rental", "tenant", "landlord"]),
    (DocumentType::Loan, &["loan", "credit", "mortgage"]),
    (DocumentType::Employment, &["employment", "job", "employee"]),
    (DocumentType::Service, &["service", "contractor", "consulting"]),
    (DocumentType::Purchase, &["purchase", "sale", "buy", "sell"]),
    (DocumentType::Partnership, &["partnership", "joint venture"]),
    (DocumentType::License, &["license", "licensing"]),
    (DocumentType::Nda, &["confidentiality", "non-disclosure", "nda"]),
];

pub fn detect_document_type(text: &str) -> DocumentType {
    let lower = text.to_lowercase();
    DOCUMENT_TYPE_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(doc_type, _)| *doc_type)
        .unwrap_or(DocumentType::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_beats_later_groups() {
        let text = "The Tenant agrees to purchase renters insurance and keep information confidential.";
        assert_eq!(detect_document_type(text), DocumentType::Lease);
    }

    #[test]
    fn test_loan_detected() {
        assert_eq!(detect_document_type("This Mortgage is granted by the Borrower."), DocumentType::Loan);
    }

    #[test]
    fn test_nda_detected() {
        assert_eq!(
            detect_document_type("Mutual NON-DISCLOSURE undertaking between the parties."),
            DocumentType::Nda
        );
    }

    #[test]
    fn test_general_when_nothing_matches() {
        assert_eq!(detect_document_type("Minutes of the annual meeting."), DocumentType::General);
    }
}

//! Generative Contract Tests
//!
//! Summary and question handling as the pipeline uses it: the local fallback
//! summary built from real analysis output, and the question parser fed with the
//! kinds of replies completion servers actually produce.

use crate::engine::{detect_document_type, ClauseAnalyzer};
use crate::error::AppError;
use crate::generative::questions::QUESTION_COUNT;
use crate::generative::{fallback_questions, fallback_summary, parse_generated_questions, parse_summary_sections, validate_summary};
use crate::terms::KeyTerms;

const SHORT_LEASE: &str = "The monthly rent of $1,200 is due on the first day. A security deposit of $2,400 is required. Either party may terminate with 30 days written notice. A late fee of $50 may be charged.";

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn test_fallback_summary_reflects_extracted_terms() {
        let terms = KeyTerms::extract(SHORT_LEASE, "en");
        let clauses = ClauseAnalyzer::new().classify_document(SHORT_LEASE);
        let summary = fallback_summary(detect_document_type(SHORT_LEASE), &terms, &clauses);

        assert!(summary.starts_with("Main Facts:"));
        assert!(summary.contains("- **Monthly Rent/Payment:** $1,200"), "{}", summary);
        assert!(summary.contains("- **Security Deposit:** $2,400"), "{}", summary);
        assert!(summary.contains("- **Notice Period:** 30 days"), "{}", summary);
        assert!(summary.contains("- **Start Date:** Not specified"));

        let sections = parse_summary_sections(&summary);
        assert_eq!(sections.len(), 4);
        let risks = sections
            .iter()
            .find(|s| s.title == "Risks and Penalties")
            .expect("risks section");
        assert!(risks.content.contains("$50"), "{}", risks.content);
    }

    #[test]
    fn test_fallback_summary_passes_its_own_validation() {
        let summary = fallback_summary(detect_document_type(SHORT_LEASE), &KeyTerms::default(), &[]);
        assert!(validate_summary(&summary).is_ok());
    }

    #[test]
    fn test_generated_summary_round_trip() {
        let generated = "\n\nMain Facts:\n- **Document Type:** Lease\n\n## Parties Involved\n- Landlord: Acme Properties LLC\n- Tenant: Jane Doe\n\n## Financial Obligations\n- Monthly rent of $1,200 due on the 1st\n";
        let summary = validate_summary(generated).unwrap();
        let sections = parse_summary_sections(&summary);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Parties Involved");
        assert!(sections[1].content.starts_with("- Monthly rent"));
    }

    #[test]
    fn test_prose_reply_is_rejected() {
        let result = validate_summary("This lease is between a landlord and a tenant.");
        assert!(matches!(result, Err(AppError::Generation(_))));
    }
}

#[cfg(test)]
mod question_tests {
    use super::*;

    #[test]
    fn test_fenced_reply_is_parsed() {
        let raw = "```json\n{\"questions\": [\"What is the monthly rent amount?\", \"When can the landlord keep the deposit?\", \"How much notice is required to leave?\", \"Are pets allowed in the unit at all?\"]}\n```";
        let questions = parse_generated_questions(raw).unwrap();

        assert_eq!(questions.len(), QUESTION_COUNT);
        assert_eq!(questions[0], "What is the monthly rent amount?");
        assert_eq!(questions[3], "Are pets allowed in the unit at all?");
    }

    #[test]
    fn test_truncated_reply_is_repaired_and_topped_up() {
        let raw = r#"{"questions": ["What is the monthly rent amount?", "When can the landl"#;
        let questions = parse_generated_questions(raw).unwrap();
        let fallback = fallback_questions();

        assert_eq!(questions.len(), QUESTION_COUNT);
        assert_eq!(questions[0], "What is the monthly rent amount?");
        assert_eq!(&questions[1..], &fallback[..3]);
    }

    #[test]
    fn test_only_first_four_entries_are_considered() {
        let raw = r#"{"questions": ["short?", 42, "No question mark here at all", "What happens if rent is late?", "Is this fifth question ignored?"]}"#;
        let questions = parse_generated_questions(raw).unwrap();

        assert_eq!(questions[0], "What happens if rent is late?");
        assert!(!questions.iter().any(|q| q == "Is this fifth question ignored?"));
        assert_eq!(questions.len(), QUESTION_COUNT);
    }

    #[test]
    fn test_top_up_skips_questions_already_present() {
        let raw = r#"{"questions": ["How can this agreement be terminated?"]}"#;
        let questions = parse_generated_questions(raw).unwrap();

        assert_eq!(questions.len(), QUESTION_COUNT);
        let repeats = questions
            .iter()
            .filter(|q| q.as_str() == "How can this agreement be terminated?")
            .count();
        assert_eq!(repeats, 1);
    }

    #[test]
    fn test_unusable_replies_are_parse_errors() {
        for raw in ["not json at all", r#"{"items": []}"#, r#"{"questions": "What?"}"#] {
            let result = parse_generated_questions(raw);
            assert!(matches!(result, Err(AppError::Parse(_))), "raw: {}", raw);
        }
    }
}

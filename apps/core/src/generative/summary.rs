//! Structured summary: prompt, validation, section parsing and the local fallback.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::{document_excerpt, PROMPT_EXCERPT_CHARS};
use crate::engine::{Clause, ClauseType, DocumentType, RiskCategory};
use crate::error::AppError;
use crate::language::language_name;
use crate::terms::{DateKind, FinancialType, KeyTerms, NoticeType};
use crate::terms::context::prefix_chars;

/// Sections whose content is this short or shorter are not rendered.
const MIN_SECTION_CONTENT: usize = 20;
const UNTITLED_PREFIX: usize = 50;
const CLAUSE_SNIPPET: usize = 160;
const MAX_LISTED: usize = 6;
const MAX_KEY_CLAUSES: usize = 5;
const NOT_SPECIFIED: &str = "Not specified";

static SECTION_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n##\s+").expect("Invalid regex: summary section heading"));

/// One rendered `## ` section of a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySection {
    pub title: String,
    pub content: String,
}

/// Prompt asking the completion server for the markdown summary contract.
pub fn build_summary_prompt(text: &str, language: &str) -> String {
    let name = language_name(language);
    let instruction = if language == "en" {
        "RESPOND IN ENGLISH.".to_string()
    } else {
        format!(
            "YOU MUST RESPOND ENTIRELY IN {}. Every heading and sentence must be written in {}.",
            name.to_uppercase(),
            name
        )
    };

    format!(
        "{instruction}

Summarize the legal document below as markdown in exactly this layout:

Main Facts:
- **Document Type:** [type]
- **Monthly Rent/Payment:** [amount, if any]
- **Security Deposit:** [amount, if any]
- **Start Date:** [date]
- **End Date:** [date]
- **Notice Period:** [period]

## Parties Involved
[each party and its main responsibilities]

## Financial Obligations
[payments, due dates, late fees and other charges]

## Rights and Obligations
[key obligations of each party, as bullet points]

## Termination and Renewal
[how the agreement ends, notice periods, renewal]

## Risks and Penalties
[specific penalties and risks, as bullet points]

Rules:
1. Use these ## headings exactly.
2. Write everything in {name}.
3. Quote amounts and dates exactly as they appear in the document.
4. Keep each section to 2-5 bullet points.

Document Text (first {limit} chars):
{excerpt}
",
        instruction = instruction,
        name = name,
        limit = PROMPT_EXCERPT_CHARS,
        excerpt = document_excerpt(text, PROMPT_EXCERPT_CHARS),
    )
}

/// Accepts a generated summary only if it carries `##` headings.
pub fn validate_summary(raw: &str) -> Result<String, AppError> {
    let summary = raw.trim();
    if summary.is_empty() || !summary.contains("##") {
        return Err(AppError::Generation("AI did not return structured format".to_string()));
    }
    Ok(summary.to_string())
}

/// Splits a summary into renderable sections.
///
/// The text before the first heading is the introduction and is skipped. A section
/// without a newline uses its first 50 chars as the title.
pub fn parse_summary_sections(summary: &str) -> Vec<SummarySection> {
    SECTION_SPLIT
        .split(summary)
        .filter(|s| !s.trim().is_empty())
        .skip(1)
        .map(|section| match section.find('\n') {
            Some(nl) if nl > 0 => SummarySection {
                title: section[..nl].trim().to_string(),
                content: section[nl + 1..].trim().to_string(),
            },
            _ => SummarySection {
                title: prefix_chars(section, UNTITLED_PREFIX).trim().to_string(),
                content: section.trim().to_string(),
            },
        })
        .filter(|s| s.content.chars().count() > MIN_SECTION_CONTENT)
        .collect()
}

fn snippet(text: &str) -> String {
    let prefix = prefix_chars(text, CLAUSE_SNIPPET);
    if prefix.len() < text.len() {
        format!("{}...", prefix.trim_end())
    } else {
        prefix.to_string()
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn first_amount<'a>(terms: &'a KeyTerms, types: &[FinancialType]) -> Option<&'a str> {
    types.iter().find_map(|wanted| {
        terms
            .financial
            .iter()
            .find(|t| t.term_type == *wanted)
            .map(|t| t.amount.as_str())
    })
}

fn first_date(terms: &KeyTerms, kind: DateKind) -> Option<&str> {
    terms.dates.iter().find(|d| d.kind == kind).map(|d| d.date.as_str())
}

/// Builds a summary in the generated-summary layout from local analysis only.
///
/// Every section always has content, so each one survives [`parse_summary_sections`].
pub fn fallback_summary(document_type: DocumentType, terms: &KeyTerms, clauses: &[Clause]) -> String {
    let payment = first_amount(
        terms,
        &[FinancialType::MonthlyRent, FinancialType::Rent, FinancialType::Payment],
    );
    let deposit = first_amount(terms, &[FinancialType::SecurityDeposit, FinancialType::Deposit]);
    let notice = terms
        .notices
        .iter()
        .find(|n| matches!(n.notice_type, NoticeType::NoticePeriod | NoticeType::TerminationNotice))
        .or_else(|| terms.notices.first())
        .map(|n| n.period.as_str());

    let mut lines: Vec<String> = vec![
        "Main Facts:".to_string(),
        format!("- **Document Type:** {}", document_type.display_name()),
        format!("- **Monthly Rent/Payment:** {}", payment.unwrap_or(NOT_SPECIFIED)),
        format!("- **Security Deposit:** {}", deposit.unwrap_or(NOT_SPECIFIED)),
        format!("- **Start Date:** {}", first_date(terms, DateKind::Start).unwrap_or(NOT_SPECIFIED)),
        format!("- **End Date:** {}", first_date(terms, DateKind::End).unwrap_or(NOT_SPECIFIED)),
        format!("- **Notice Period:** {}", notice.unwrap_or(NOT_SPECIFIED)),
    ];

    lines.push("\n## Financial Obligations".to_string());
    if terms.financial.is_empty() {
        lines.push("- No specific amounts were identified in the document.".to_string());
    }
    lines.extend(
        terms
            .financial
            .iter()
            .take(MAX_LISTED)
            .map(|term| format!("- **{}:** {}", term.term_type, term.amount)),
    );
    lines.extend(
        terms
            .dates
            .iter()
            .filter(|d| d.kind == DateKind::Due)
            .take(2)
            .map(|date| format!("- **{}:** {}", date.label, date.date)),
    );

    lines.push("\n## Termination and Renewal".to_string());
    let section_start = lines.len();
    lines.extend(
        terms
            .notices
            .iter()
            .take(MAX_LISTED)
            .map(|notice| format!("- **{}:** {}", notice.notice_type.label(), notice.period)),
    );
    lines.extend(
        terms
            .dates
            .iter()
            .filter(|d| d.kind == DateKind::End)
            .take(2)
            .map(|date| format!("- **{}:** {}", date.label, date.date)),
    );
    lines.extend(
        clauses
            .iter()
            .filter(|c| matches!(c.clause_type, ClauseType::Termination | ClauseType::Renewal))
            .take(2)
            .map(|clause| format!("- {}", snippet(&clause.text))),
    );
    if lines.len() == section_start {
        lines.push("- No termination or renewal terms were identified automatically.".to_string());
    }

    lines.push("\n## Risks and Penalties".to_string());
    for penalty in terms.penalties.iter().take(MAX_LISTED) {
        let amounts = if penalty.amounts.is_empty() {
            "amount not stated".to_string()
        } else {
            penalty.amounts.join(", ")
        };
        lines.push(format!(
            "- **{}** ({} severity): {}",
            penalty.penalty_type, penalty.severity, amounts
        ));
    }
    let high_risk: Vec<&Clause> = clauses
        .iter()
        .filter(|c| c.risk_category == RiskCategory::High)
        .take(3)
        .collect();
    lines.extend(high_risk.iter().map(|clause| {
        format!("- High-risk clause (score {}/5): {}", clause.risk_score, snippet(&clause.text))
    }));
    if terms.penalties.is_empty() && high_risk.is_empty() {
        lines.push(
            "- No explicit penalties were identified automatically; review the document carefully.".to_string(),
        );
    }

    lines.push("\n## Key Clauses".to_string());
    let mut ranked: Vec<&Clause> = clauses.iter().collect();
    ranked.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    if ranked.is_empty() {
        lines.push("- No clauses could be identified in this document.".to_string());
    }
    lines.extend(ranked.into_iter().take(MAX_KEY_CLAUSES).map(|clause| {
        format!(
            "- **{}** (risk {}/5): {}",
            capitalize(clause.clause_type.label()),
            clause.risk_score,
            snippet(&clause.text)
        )
    }));

    lines.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_intro_and_short_sections() {
        let summary = "Main Facts:\n- **Type:** Lease\n\n## Parties Involved\nLandlord: Acme Corp, Tenant: Jane Doe\n\n## Empty\nshort\n## Risks and Penalties\n- Late fee of $50 after five days";
        let sections = parse_summary_sections(summary);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Parties Involved");
        assert_eq!(sections[0].content, "Landlord: Acme Corp, Tenant: Jane Doe");
        assert_eq!(sections[1].title, "Risks and Penalties");
    }

    #[test]
    fn test_parse_section_without_newline() {
        let summary = "Intro\n## A heading that is also the whole content of this section";
        let sections = parse_summary_sections(summary);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title.chars().count(), 50);
        assert_eq!(sections[0].content, "A heading that is also the whole content of this section");
    }

    #[test]
    fn test_validate_requires_headings() {
        assert!(validate_summary("Plain prose with no headings.").is_err());
        assert!(validate_summary("   ").is_err());
        assert_eq!(validate_summary(" x\n## Parties\ny ").unwrap(), "x\n## Parties\ny");
    }

    #[test]
    fn test_prompt_carries_language_and_excerpt() {
        let prompt = build_summary_prompt("Das ist der Vertrag.", "de");
        assert!(prompt.starts_with("YOU MUST RESPOND ENTIRELY IN GERMAN."));
        assert!(prompt.contains("## Risks and Penalties"));
        assert!(prompt.ends_with("Das ist der Vertrag.\n"));
    }

    #[test]
    fn test_fallback_summary_with_no_terms_still_renders_every_section() {
        let summary = fallback_summary(DocumentType::General, &KeyTerms::default(), &[]);
        let sections = parse_summary_sections(&summary);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Financial Obligations", "Termination and Renewal", "Risks and Penalties", "Key Clauses"]
        );
        assert!(summary.contains("- **Document Type:** Legal Document"));
    }

    #[test]
    fn test_fallback_summary_empty_layout() {
        let summary = fallback_summary(DocumentType::General, &KeyTerms::default(), &[]);
        let expected = "Main Facts:\n\
            - **Document Type:** Legal Document\n\
            - **Monthly Rent/Payment:** Not specified\n\
            - **Security Deposit:** Not specified\n\
            - **Start Date:** Not specified\n\
            - **End Date:** Not specified\n\
            - **Notice Period:** Not specified\n\
            \n\
            ## Financial Obligations\n\
            - No specific amounts were identified in the document.\n\
            \n\
            ## Termination and Renewal\n\
            - No termination or renewal terms were identified automatically.\n\
            \n\
            ## Risks and Penalties\n\
            - No explicit penalties were identified automatically; review the document carefully.\n\
            \n\
            ## Key Clauses\n\
            - No clauses could be identified in this document.";
        assert_eq!(summary, expected);
    }
}

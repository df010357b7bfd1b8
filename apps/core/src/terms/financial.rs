//! Currency amount extraction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use super::context::{clipped_range, ellipsize_long, CharIndex, Span};

const CONTEXT_RADIUS: usize = 80;
const CONTEXT_LIMIT: usize = 120;
/// Matches starting closer than this to an accepted match are dropped.
const OVERLAP_DISTANCE: usize = 5;

/// Subtype of a financial amount, decided from the words around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancialType {
    Payment,
    #[serde(rename = "Security Deposit")]
    SecurityDeposit,
    #[serde(rename = "Monthly Rent")]
    MonthlyRent,
    Rent,
    Deposit,
}

impl FinancialType {
    pub fn label(&self) -> &'static str {
        match self {
            FinancialType::Payment => "Payment",
            FinancialType::SecurityDeposit => "Security Deposit",
            FinancialType::MonthlyRent => "Monthly Rent",
            FinancialType::Rent => "Rent",
            FinancialType::Deposit => "Deposit",
        }
    }
}

impl fmt::Display for FinancialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTerm {
    pub amount: String,
    #[serde(rename = "type")]
    pub term_type: FinancialType,
    pub context: String,
    pub original_index: usize,
}

/// Currency families in priority order. The first four also serve penalty amount scans.
pub(crate) static CURRENCY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\$[0-9,]+(?:\.[0-9]{2})?").expect("Invalid regex: USD amount"),
        Regex::new(r"€\s*[0-9][0-9\s,]*(?:[.,][0-9]{2})?").expect("Invalid regex: EUR amount"),
        Regex::new(r"£[0-9,]+(?:\.[0-9]{2})?").expect("Invalid regex: GBP amount"),
        Regex::new(r"₹[0-9,]+(?:\.[0-9]{2})?").expect("Invalid regex: INR symbol amount"),
        Regex::new(r"\bRs\.?\s+[0-9,]+(?:\.[0-9]{2})?").expect("Invalid regex: INR Rs amount"),
        Regex::new(r"\bINR\s+[0-9,]+(?:\.[0-9]{2})?").expect("Invalid regex: INR code amount"),
        Regex::new(r"[0-9,]+(?:\.[0-9]{2})?\s+Rupees").expect("Invalid regex: Rupees word amount"),
        Regex::new(r"\([0-9,]+(?:\.[0-9]{2})?\s*Rupees(?:\s+only)?\)").expect("Invalid regex: Rupees paren amount"),
    ]
});

/// Subtype rules, checked in order.
static TYPE_RULES: LazyLock<Vec<(Regex, FinancialType)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)security\s+deposit").expect("Invalid regex: security deposit"),
            FinancialType::SecurityDeposit,
        ),
        (
            Regex::new(r"(?i)monthly\s+rent|rent\s+for").expect("Invalid regex: monthly rent"),
            FinancialType::MonthlyRent,
        ),
        (Regex::new(r"(?i)\brent\b").expect("Invalid regex: rent"), FinancialType::Rent),
        (Regex::new(r"(?i)\bdeposit\b").expect("Invalid regex: deposit"), FinancialType::Deposit),
    ]
});

pub fn classify_amount_context(context: &str) -> FinancialType {
    TYPE_RULES
        .iter()
        .find(|(re, _)| re.is_match(context))
        .map(|(_, t)| *t)
        .unwrap_or(FinancialType::Payment)
}

const KEY_STRIPPED: [char; 7] = ['₹', '$', '€', '£', ',', '(', ')'];

/// Deduplication key: the amount without currency symbols, commas, parentheses
/// and whitespace, plus its subtype.
///
/// Letters and the decimal point are kept, so "₹10,000" and "₹10000" share a key
/// while "Rs. 10,000" and "10,000 Rupees" do not.
pub fn dedup_key(amount: &str, term_type: FinancialType) -> String {
    let normalized: String = amount
        .chars()
        .filter(|c| !KEY_STRIPPED.contains(c) && !c.is_whitespace())
        .collect();
    format!("{}-{}", normalized, term_type.label())
}

struct AcceptedMatch {
    amount: String,
    span: Span,
}

/// Extracts currency amounts from `text`.
///
/// Patterns run in priority order; a match starting within five characters of an
/// already accepted match is dropped. Results are unique by normalized amount and subtype.
pub fn extract_financial_terms(text: &str) -> Vec<FinancialTerm> {
    if text.is_empty() {
        return Vec::new();
    }

    let index = CharIndex::new(text);
    let mut accepted: Vec<AcceptedMatch> = Vec::new();

    for pattern in CURRENCY_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let start = index.char_of(m.start());
            let is_overlapping = accepted
                .iter()
                .any(|a| a.span.start.abs_diff(start) < OVERLAP_DISTANCE);
            if is_overlapping {
                continue;
            }

            // Thousands separators also swallow a trailing sentence comma.
            let amount = m
                .as_str()
                .trim()
                .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
                .to_string();
            let span = Span {
                start,
                end: start + amount.chars().count(),
            };
            accepted.push(AcceptedMatch { amount, span });
        }
    }

    let spans: Vec<Span> = accepted.iter().map(|a| a.span).collect();
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    for (i, found) in accepted.into_iter().enumerate() {
        let (lo, hi) = clipped_range(&spans, i, CONTEXT_RADIUS, CONTEXT_RADIUS);
        let term_type = classify_amount_context(index.slice(lo, hi));

        if !seen.insert(dedup_key(&found.amount, term_type)) {
            continue;
        }

        let context = index.window(found.span, CONTEXT_RADIUS, CONTEXT_RADIUS).trim();
        terms.push(FinancialTerm {
            amount: found.amount,
            term_type,
            context: ellipsize_long(context, CONTEXT_LIMIT),
            original_index: found.span.start,
        });
    }

    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_strips_symbols() {
        assert_eq!(
            dedup_key("₹10,000", FinancialType::Deposit),
            dedup_key("$10000", FinancialType::Deposit)
        );
        assert_eq!(dedup_key("€ 1 500,00", FinancialType::Payment), "150000-Payment");
        assert_eq!(dedup_key("$1,200.50", FinancialType::Rent), "1200.50-Rent");
    }

    #[test]
    fn test_dedup_key_keeps_currency_words() {
        assert_eq!(dedup_key("Rs. 10,000", FinancialType::Rent), "Rs.10000-Rent");
        assert_eq!(dedup_key("10,000 Rupees", FinancialType::Rent), "10000Rupees-Rent");
        assert_eq!(
            dedup_key("(10,000 Rupees only)", FinancialType::Rent),
            "10000Rupeesonly-Rent"
        );
    }

    #[test]
    fn test_subtype_priority() {
        assert_eq!(
            classify_amount_context("monthly rent plus security deposit"),
            FinancialType::SecurityDeposit
        );
        assert_eq!(classify_amount_context("rent for March"), FinancialType::MonthlyRent);
        assert_eq!(classify_amount_context("the rent is"), FinancialType::Rent);
        assert_eq!(classify_amount_context("parental deposit"), FinancialType::Deposit);
        assert_eq!(classify_amount_context("current fees"), FinancialType::Payment);
    }

    #[test]
    fn test_trailing_comma_is_not_part_of_amount() {
        let terms = extract_financial_terms("A deposit of ₹50,000, refundable.");
        assert_eq!(terms[0].amount, "₹50,000");
    }

    #[test]
    fn test_euro_sign_needs_digits() {
        assert!(extract_financial_terms("Prices in € are final.").is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_financial_terms("").is_empty());
    }
}

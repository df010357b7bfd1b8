//! Penalty clause extraction keyed on per-language trigger words.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::context::{ellipsize_long, prefix_chars, CharIndex, Span};
use super::financial::CURRENCY_PATTERNS;
use super::locale::PENALTY_KEYWORDS;
use crate::engine::clause::RiskCategory;

const CONTEXT_BEFORE: usize = 60;
const CONTEXT_AFTER: usize = 100;
const CONTEXT_LIMIT: usize = 120;
const FINGERPRINT_LEN: usize = 100;
/// Penalty amounts are scanned with the symbol-prefixed currency patterns only.
const AMOUNT_PATTERN_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyTerm {
    /// Title-cased trigger keyword.
    #[serde(rename = "type")]
    pub penalty_type: String,
    pub severity: RiskCategory,
    pub amounts: Vec<String>,
    pub context: String,
    /// 5 for high severity, 3 for medium, 1 for low.
    pub risk_score: u8,
    pub original_index: usize,
}

struct KeywordMatcher {
    keyword: &'static str,
    regex: Regex,
}

/// Whole-word, case-insensitive matchers per language.
static MATCHERS: LazyLock<Vec<(&'static str, Vec<KeywordMatcher>)>> = LazyLock::new(|| {
    PENALTY_KEYWORDS
        .iter()
        .map(|(language, keywords)| {
            let matchers = keywords
                .iter()
                .map(|keyword| KeywordMatcher {
                    keyword: *keyword,
                    regex: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword)))
                        .expect("Invalid regex: penalty keyword"),
                })
                .collect();
            (*language, matchers)
        })
        .collect()
});

static HIGH_SEVERITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)immediately|inmediatamente|immédiatement|sofort|forfeit|pérdida|perte|evict|desalojo")
        .expect("Invalid regex: high severity")
});

static LOW_SEVERITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)may|could|puede|pourrait|könnte").expect("Invalid regex: low severity"));

fn matchers_for(language: &str) -> &'static [KeywordMatcher] {
    MATCHERS
        .iter()
        .find(|(code, _)| *code == language)
        .or_else(|| MATCHERS.first())
        .map(|(_, matchers)| matchers.as_slice())
        .unwrap_or(&[])
}

pub fn severity_of(context: &str) -> RiskCategory {
    if HIGH_SEVERITY.is_match(context) {
        RiskCategory::High
    } else if LOW_SEVERITY.is_match(context) {
        RiskCategory::Low
    } else {
        RiskCategory::Medium
    }
}

pub fn severity_score(severity: RiskCategory) -> u8 {
    match severity {
        RiskCategory::High => 5,
        RiskCategory::Medium => 3,
        RiskCategory::Low => 1,
    }
}

fn title_case(keyword: &str) -> String {
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn amounts_in(context: &str) -> Vec<String> {
    CURRENCY_PATTERNS
        .iter()
        .take(AMOUNT_PATTERN_COUNT)
        .flat_map(|pattern| pattern.find_iter(context))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Extracts penalty mentions for `language` (English keywords when unsupported).
///
/// A match whose context starts like an already reported one is skipped, even when a
/// different keyword triggered it.
pub fn extract_penalties(text: &str, language: &str) -> Vec<PenaltyTerm> {
    let index = CharIndex::new(text);
    let mut seen_fingerprints = HashSet::new();
    let mut terms = Vec::new();

    for matcher in matchers_for(language) {
        let keyword_len = matcher.keyword.chars().count();

        for m in matcher.regex.find_iter(text) {
            let start = index.char_of(m.start());
            let anchor = Span { start, end: start };
            let context = index.window(anchor, CONTEXT_BEFORE, keyword_len + CONTEXT_AFTER).trim();

            let fingerprint = prefix_chars(context, FINGERPRINT_LEN).to_lowercase().trim().to_string();
            if !seen_fingerprints.insert(fingerprint) {
                continue;
            }

            let severity = severity_of(context);
            terms.push(PenaltyTerm {
                penalty_type: title_case(matcher.keyword),
                severity,
                amounts: amounts_in(context),
                context: ellipsize_long(context, CONTEXT_LIMIT),
                risk_score: severity_score(severity),
                original_index: start,
            });
        }
    }

    terms
}

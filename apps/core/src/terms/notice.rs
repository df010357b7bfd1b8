//! Notice and grace period extraction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::context::{clipped_range, surround_ellipsis, CharIndex, Span};
use super::locale::day_unit;

const CONTEXT_RADIUS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeType {
    #[serde(rename = "Notice Period")]
    NoticePeriod,
    #[serde(rename = "Grace Period")]
    GracePeriod,
    #[serde(rename = "Termination Notice")]
    TerminationNotice,
    #[serde(rename = "Late Payment Grace")]
    LatePaymentGrace,
}

impl NoticeType {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeType::NoticePeriod => "Notice Period",
            NoticeType::GracePeriod => "Grace Period",
            NoticeType::TerminationNotice => "Termination Notice",
            NoticeType::LatePaymentGrace => "Late Payment Grace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeTerm {
    /// Day count with a localized unit, e.g. "30 days".
    pub period: String,
    #[serde(rename = "type")]
    pub notice_type: NoticeType,
    pub is_grace_period: bool,
    pub context: String,
    pub original_index: usize,
}

const DAY_WORDS: &str = "days?|días?|jours?|tage|giorni|dias?";

static NOTICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(&format!(
            r"(?i)([0-9]+)\s+(?:{})\s+(?:written\s+)?(?:notice|aviso|préavis|kündigungsfrist|preavviso|prior|before|grace)",
            DAY_WORDS
        ))
        .expect("Invalid regex: days before notice"),
        Regex::new(&format!(
            r"(?i)(?:notice|aviso|préavis|kündigungsfrist|preavviso)\s+(?:of|de)\s+([0-9]+)\s+(?:{})",
            DAY_WORDS
        ))
        .expect("Invalid regex: notice of days"),
    ]
});

static TYPE_RULES: LazyLock<Vec<(Regex, NoticeType)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)grace|gracia|délai de grâce|schonfrist").expect("Invalid regex: grace keywords"),
            NoticeType::GracePeriod,
        ),
        (
            Regex::new(r"(?i)terminat|cancel|rescind|resiliación|résiliation|kündigung")
                .expect("Invalid regex: termination keywords"),
            NoticeType::TerminationNotice,
        ),
        (
            Regex::new(r"(?i)late|retraso|retard|verspätung|mora").expect("Invalid regex: late keywords"),
            NoticeType::LatePaymentGrace,
        ),
    ]
});

pub fn classify_notice_context(context: &str) -> NoticeType {
    TYPE_RULES
        .iter()
        .find(|(re, _)| re.is_match(context))
        .map(|(_, t)| *t)
        .unwrap_or(NoticeType::NoticePeriod)
}

/// Extracts notice periods. Unique by source offset, so equal periods at
/// different places stay separate.
pub fn extract_notice_periods(text: &str, language: &str) -> Vec<NoticeTerm> {
    let index = CharIndex::new(text);

    let found: Vec<(Span, String)> = NOTICE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let days = caps.get(1)?.as_str().to_string();
            Some((index.span(whole.start(), whole.end()), days))
        })
        .collect();
    let spans: Vec<Span> = found.iter().map(|(span, _)| *span).collect();

    let mut seen = HashSet::new();
    let mut terms = Vec::new();
    for (i, (span, days)) in found.iter().enumerate() {
        if !seen.insert(span.start) {
            continue;
        }

        let (lo, hi) = clipped_range(&spans, i, CONTEXT_RADIUS, CONTEXT_RADIUS);
        let notice_type = classify_notice_context(index.slice(lo, hi));
        let context = index.window(*span, CONTEXT_RADIUS, CONTEXT_RADIUS).trim();

        terms.push(NoticeTerm {
            period: format!("{} {}", days, day_unit(language)),
            notice_type,
            is_grace_period: notice_type == NoticeType::GracePeriod,
            context: surround_ellipsis(context),
            original_index: span.start,
        });
    }

    terms
}

//! Multilingual date extraction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::context::{clipped_range, surround_ellipsis, CharIndex, Span};
use super::locale::date_labels;

const CONTEXT_RADIUS: usize = 40;

/// Language-independent date subtype; `DateTerm::label` carries the localized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateKind {
    Start,
    End,
    Due,
    Update,
    Important,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTerm {
    /// Literal matched text.
    pub date: String,
    #[serde(rename = "type")]
    pub label: String,
    pub kind: DateKind,
    pub context: String,
    pub original_index: usize,
}

const EN_MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December";
const ES_MONTHS: &str = "enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|octubre|noviembre|diciembre";
const FR_MONTHS: &str = "janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre";
const DE_MONTHS: &str = "Januar|Februar|März|April|Mai|Juni|Juli|August|September|Oktober|November|Dezember";
const MONTH_ABBREVIATIONS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

/// All patterns run independently; one date string may satisfy several.
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let sources = [
        r"[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}".to_string(),
        r"[0-9]{1,2}-[0-9]{1,2}-[0-9]{2,4}".to_string(),
        format!(r"(?i)\b(?:{})\s+[0-9]{{1,2}},?\s+[0-9]{{4}}\b", EN_MONTHS),
        format!(r"(?i)\b(?:{})\s+(?:de\s+)?[0-9]{{4}}", ES_MONTHS),
        format!(r"(?i)\b[0-9]{{1,2}}\s+de\s+(?:{})\s+de\s+[0-9]{{4}}\b", ES_MONTHS),
        format!(r"(?i)\b(?:{})\s+[0-9]{{4}}", FR_MONTHS),
        format!(r"(?i)\b[0-9]{{1,2}}\s+(?:{})\s+[0-9]{{4}}\b", FR_MONTHS),
        r"\b[0-9]{4}-[0-9]{2}-[0-9]{2}\b".to_string(),
        format!(r"(?i)\b(?:{})[0-9A-Za-z_]*\s+[0-9]{{4}}\b", MONTH_ABBREVIATIONS),
        format!(r"(?i)\b[0-9]{{1,2}}\s+(?:{})[0-9A-Za-z_]*\s+[0-9]{{4}}\b", MONTH_ABBREVIATIONS),
        format!(r"(?i)\b[0-9]{{1,2}}\.\s*(?:{})\s+[0-9]{{4}}\b", DE_MONTHS),
    ];
    sources
        .iter()
        .map(|src| Regex::new(src).expect("Invalid regex: date pattern"))
        .collect()
});

static KIND_RULES: LazyLock<Vec<(Regex, DateKind)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)begin|start|início|comienzo|début|beginn|inizio|efectiva")
                .expect("Invalid regex: start date keywords"),
            DateKind::Start,
        ),
        (
            Regex::new(r"(?i)end|expir|término|fin|vencimiento|échéance|ablauf|scadenza")
                .expect("Invalid regex: end date keywords"),
            DateKind::End,
        ),
        (
            Regex::new(r"(?i)due|vencimiento|échéance|fällig|scadenza|pagamento")
                .expect("Invalid regex: due date keywords"),
            DateKind::Due,
        ),
        (
            Regex::new(r"(?i)actualización|update|mise à jour|aktualisierung|aggiornamento|última actualización")
                .expect("Invalid regex: update date keywords"),
            DateKind::Update,
        ),
    ]
});

pub fn classify_date_context(context: &str) -> DateKind {
    KIND_RULES
        .iter()
        .find(|(re, _)| re.is_match(context))
        .map(|(_, kind)| *kind)
        .unwrap_or(DateKind::Important)
}

fn label_for(kind: DateKind, language: &str) -> &'static str {
    let labels = date_labels(language);
    match kind {
        DateKind::Start => labels.start,
        DateKind::End => labels.end,
        DateKind::Due => labels.due,
        DateKind::Update => labels.update,
        DateKind::Important => labels.important,
    }
}

/// Extracts date mentions, labelled in `language`. Unique by literal date string.
pub fn extract_date_terms(text: &str, language: &str) -> Vec<DateTerm> {
    let index = CharIndex::new(text);

    let found: Vec<(Span, &str)> = DATE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(text))
        .map(|m| (index.span(m.start(), m.end()), m.as_str()))
        .collect();
    let spans: Vec<Span> = found.iter().map(|(span, _)| *span).collect();

    let mut seen = HashSet::new();
    let mut terms = Vec::new();
    for (i, (span, date)) in found.iter().enumerate() {
        if !seen.insert(*date) {
            continue;
        }

        let (lo, hi) = clipped_range(&spans, i, CONTEXT_RADIUS, CONTEXT_RADIUS);
        let kind = classify_date_context(index.slice(lo, hi));
        let context = index.window(*span, CONTEXT_RADIUS, CONTEXT_RADIUS).trim();

        terms.push(DateTerm {
            date: date.to_string(),
            label: label_for(kind, language).to_string(),
            kind,
            context: surround_ellipsis(context),
            original_index: span.start,
        });
    }

    terms
}

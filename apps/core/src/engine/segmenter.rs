//! Clause segmentation.
//!
//! A priority cascade of strategies, each tried only when the previous ones produced
//! too little: structural markers, sentences, paragraphs, then fixed-width chunks.
//! The first marker family that splits the text wins; families are not compared.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::terms::context::prefix_chars;

/// Upper bound on clauses returned for one document.
pub const MAX_CLAUSES: usize = 10;
/// Cleaned clause length bounds, inclusive, in chars.
pub const MIN_CLAUSE_LEN: usize = 40;
pub const MAX_CLAUSE_LEN: usize = 1000;
/// Length of the single clause returned when nothing else qualifies.
pub const FALLBACK_PREFIX_LEN: usize = 500;

const MARKER_MIN_PARTS: usize = 4;
const MARKER_PART_MIN_LEN: usize = 50;
const MARKER_TAKE: usize = 15;

const SENTENCE_MIN_LEN: usize = 30;
const LONG_SENTENCE_LEN: usize = 80;
const LONG_SENTENCE_TAKE: usize = 15;
const LONG_SENTENCE_ENOUGH: usize = 8;
const PAIR_MIN_LEN: usize = 50;
const PAIR_TAKE: usize = 12;

const PARAGRAPH_MIN_LEN: usize = 50;
const PARAGRAPH_TAKE: usize = 12;

const CHUNK_SIZE: usize = 400;
const CHUNK_MIN_LEN: usize = 100;
const CHUNK_TAKE: usize = 10;

/// Section marker families in priority order.
static SECTION_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\n\s*[0-9]+\.\s+").expect("Invalid regex: numbered sections"),
        Regex::new(r"\n\s*[A-Z]\.\s+").expect("Invalid regex: lettered sections"),
        Regex::new(r"\n\s*\([a-z]\)\s+").expect("Invalid regex: parenthetical letters"),
        Regex::new(r"(?i)\n\s*Article\s+[0-9]+").expect("Invalid regex: Article markers"),
        Regex::new(r"(?i)\n\s*Section\s+[0-9]+").expect("Invalid regex: Section markers"),
        Regex::new(r"(?i)\n\s*Clause\s+[0-9]+").expect("Invalid regex: Clause markers"),
    ]
});

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("Invalid regex: paragraph break"));

static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").expect("Invalid regex: newlines"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace"));

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Splits on the first marker family that yields more than three parts.
fn split_by_markers(text: &str) -> Vec<String> {
    for (family, marker) in SECTION_MARKERS.iter().enumerate() {
        let sections: Vec<&str> = marker.split(text).collect();
        if sections.len() >= MARKER_MIN_PARTS {
            debug!(family, sections = sections.len(), "Section marker family matched");
            return sections
                .into_iter()
                .filter(|s| char_len(s.trim()) > MARKER_PART_MIN_LEN)
                .take(MARKER_TAKE)
                .map(|s| s.trim().to_string())
                .collect();
        }
    }
    Vec::new()
}

/// Splits after `.`, `!` or `?` when whitespace and then an ASCII capital follow.
/// The whitespace run is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut segment_start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (_, c) = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            if j > i + 1 && j < chars.len() && chars[j].1.is_ascii_uppercase() {
                let cut = chars[i + 1].0;
                sentences.push(&text[segment_start..cut]);
                segment_start = chars[j].0;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    sentences.push(&text[segment_start..]);
    sentences
}

fn split_by_sentences(text: &str) -> Vec<String> {
    let flattened = NEWLINES.replace_all(text, " ");
    let sentences: Vec<&str> = split_sentences(&flattened)
        .into_iter()
        .filter(|s| char_len(s.trim()) > SENTENCE_MIN_LEN)
        .collect();
    debug!(sentences = sentences.len(), "Sentence split");

    let long_sentences: Vec<String> = sentences
        .iter()
        .map(|s| s.trim())
        .filter(|s| char_len(s) > LONG_SENTENCE_LEN)
        .take(LONG_SENTENCE_TAKE)
        .map(str::to_string)
        .collect();
    if long_sentences.len() >= LONG_SENTENCE_ENOUGH {
        return long_sentences;
    }

    sentences
        .chunks(2)
        .map(|pair| pair.join(" ").trim().to_string())
        .filter(|group| char_len(group) > PAIR_MIN_LEN)
        .take(PAIR_TAKE)
        .collect()
}

fn split_by_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| char_len(p) > PARAGRAPH_MIN_LEN)
        .map(str::to_string)
        .collect()
}

fn split_by_chunks(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(CHUNK_SIZE)
        .map(|chunk| chunk.iter().collect::<String>().trim().to_string())
        .filter(|chunk| char_len(chunk) > CHUNK_MIN_LEN)
        .take(CHUNK_TAKE)
        .collect()
}

/// Collapses whitespace runs and trims.
pub fn normalize_clause(clause: &str) -> String {
    WHITESPACE.replace_all(clause, " ").trim().to_string()
}

/// Splits `text` into between 1 and [`MAX_CLAUSES`] clause strings.
///
/// Every clause produced by a strategy has a cleaned length within
/// [`MIN_CLAUSE_LEN`]..=[`MAX_CLAUSE_LEN`]. When none qualifies, the only clause is
/// the first [`FALLBACK_PREFIX_LEN`] chars of the raw text.
pub fn split_into_clauses(text: &str) -> Vec<String> {
    info!(text_len = char_len(text), "Starting clause segmentation");

    let mut clauses = split_by_markers(text);

    if clauses.len() < 5 {
        debug!("Using sentence-based splitting");
        clauses = split_by_sentences(text);
    }

    if clauses.len() < 5 {
        debug!("Using paragraph-based splitting");
        let paragraphs = split_by_paragraphs(text);
        if paragraphs.len() > clauses.len() {
            clauses = paragraphs.into_iter().take(PARAGRAPH_TAKE).collect();
        }
    }

    if clauses.len() < 3 {
        debug!("Using character-based chunking");
        clauses = split_by_chunks(text);
    }

    let cleaned: Vec<String> = clauses
        .iter()
        .map(|c| normalize_clause(c))
        .filter(|c| (MIN_CLAUSE_LEN..=MAX_CLAUSE_LEN).contains(&char_len(c)))
        .take(MAX_CLAUSES)
        .collect();

    info!(clauses = cleaned.len(), "Clause segmentation complete");

    if cleaned.is_empty() {
        vec![fallback_clause_text(text)]
    } else {
        cleaned
    }
}

/// The degenerate single clause: the first 500 chars of the raw text.
pub fn fallback_clause_text(text: &str) -> String {
    prefix_chars(text, FALLBACK_PREFIX_LEN).to_string()
}

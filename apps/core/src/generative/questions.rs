//! Suggested document questions: prompt, JSON repair and filtering.

use serde_json::Value;
use tracing::{info, warn};

use super::{document_excerpt, PROMPT_EXCERPT_CHARS};
use crate::engine::questions::FALLBACK_DOCUMENT_QUESTIONS;
use crate::error::AppError;
use crate::language::language_name;

/// Number of questions every result carries.
pub const QUESTION_COUNT: usize = 4;
/// Generated questions this short or shorter are dropped.
const MIN_QUESTION_LEN: usize = 15;

/// The four fixed questions used when generation is unavailable.
pub fn fallback_questions() -> Vec<String> {
    FALLBACK_DOCUMENT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

pub fn build_questions_prompt(text: &str, language: &str) -> String {
    let name = language_name(language);
    let instruction = if language == "en" {
        "Generate questions in English.".to_string()
    } else {
        format!("CRITICAL: Generate ALL questions in {}. Do not use English.", name.to_uppercase())
    };

    format!(
        "{instruction}

You are helping a non-expert understand the risks and obligations in a legal document.

Write exactly {count} specific, practical questions this person should ask about the document.

Rules:
1. Focus on amounts, penalties, deadlines and maintenance duties.
2. Every question must concern the document below.
3. Reply with one JSON object whose \"questions\" property is an array of {count} strings.
4. Do not add ids, numbering or any other fields.

Document Context:
---
{excerpt}
---
",
        instruction = instruction,
        count = QUESTION_COUNT,
        excerpt = document_excerpt(text, PROMPT_EXCERPT_CHARS),
    )
}

/// Removes a surrounding markdown code fence, with or without a `json` tag.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest.trim_start();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Closes a JSON document cut off mid-way.
///
/// An unterminated string is closed, a dangling comma dropped, a key left without a
/// value gets `null`, and every open array or object is closed in nesting order.
/// Input that is already complete is returned unchanged.
pub fn repair_truncated_json(raw: &str) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in raw.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    let mut repaired = raw.to_string();
    if in_string {
        if escaped {
            repaired.pop();
        }
        repaired.push('"');
    }

    let kept = repaired.trim_end().len();
    repaired.truncate(kept);
    if repaired.ends_with(',') {
        repaired.pop();
    }
    if repaired.trim_end().ends_with(':') {
        repaired.push_str("null");
    }

    while let Some(closer) = stack.pop() {
        repaired.push(closer);
    }
    repaired
}

/// Parses a generated questions reply into exactly four questions.
///
/// Only the first four array entries are considered. Entries that are not strings,
/// lack a `?` or are too short are dropped, and the fixed questions fill the gaps.
pub fn parse_generated_questions(raw: &str) -> Result<Vec<String>, AppError> {
    let body = strip_code_fences(raw);
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => {
            let repaired = repair_truncated_json(body);
            serde_json::from_str(&repaired).map_err(|e| {
                warn!(response_len = raw.len(), "Generated questions could not be repaired");
                AppError::Parse(format!("AI returned unparseable JSON: {}", e))
            })?
        }
    };

    let items = value
        .get("questions")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Parse("Response has no \"questions\" array".to_string()))?;

    let mut questions: Vec<String> = items
        .iter()
        .take(QUESTION_COUNT)
        .filter_map(Value::as_str)
        .filter(|q| q.contains('?') && q.chars().count() > MIN_QUESTION_LEN)
        .map(str::to_string)
        .collect();
    info!(accepted = questions.len(), "Extracted generated questions");

    for fallback in FALLBACK_DOCUMENT_QUESTIONS {
        if questions.len() >= QUESTION_COUNT {
            break;
        }
        if !questions.iter().any(|q| q == fallback) {
            questions.push(fallback.to_string());
        }
    }
    questions.truncate(QUESTION_COUNT);
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```JSON {\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {} "), "{}");
    }

    #[test]
    fn test_repair_closes_string_array_and_object() {
        let repaired = repair_truncated_json(r#"{"questions": ["What is the rent?", "When is it du"#);
        assert_eq!(repaired, r#"{"questions": ["What is the rent?", "When is it du"]}"#);
    }

    #[test]
    fn test_repair_drops_trailing_comma() {
        let repaired = repair_truncated_json("{\"questions\": [\"What is the rent?\",\n");
        assert_eq!(repaired, r#"{"questions": ["What is the rent?"]}"#);
    }

    #[test]
    fn test_repair_ignores_brackets_inside_strings() {
        let repaired = repair_truncated_json(r#"{"questions": ["Is [clause 4] {binding}?"#);
        assert_eq!(repaired, r#"{"questions": ["Is [clause 4] {binding}?"]}"#);
    }

    #[test]
    fn test_repair_leaves_complete_json_alone() {
        let complete = r#"{"questions": ["a"]}"#;
        assert_eq!(repair_truncated_json(complete), complete);
    }

    #[test]
    fn test_dangling_key_gets_null() {
        assert_eq!(repair_truncated_json(r#"{"questions":"#), r#"{"questions":null}"#);
    }
}

//! Grounded question answering over one document.

use super::document_excerpt;
use crate::language::language_name;

/// Document chars included in an answer prompt.
pub const ANSWER_CONTEXT_CHARS: usize = 32_000;

/// Returned when generation is disabled.
pub const ANSWER_UNAVAILABLE: &str = "I'm having trouble accessing AI services right now. Please try asking a more specific question about the document's terms, obligations, or key provisions.";

/// Returned when the completion call fails.
pub const ANSWER_FAILED: &str = "I'm having trouble processing your question right now. This might be due to high demand on our AI services. Please try rephrasing your question or asking about specific terms, deadlines, or obligations in the document.";

pub fn build_answer_prompt(question: &str, document_text: &str, language: &str) -> String {
    let instruction = if language == "en" {
        String::new()
    } else {
        format!("Answer in {}.\n", language_name(language))
    };

    format!(
        "{instruction}Answer the question about the legal document in plain, clear language.
Use ONLY the document text below. If the answer is not in it, say that you cannot find it.

Question: {question}

Document Text: {excerpt}

Answer (be specific and helpful):
",
        instruction = instruction,
        question = question.trim(),
        excerpt = document_excerpt(document_text, ANSWER_CONTEXT_CHARS),
    )
}

/// Trims the generated answer, substituting the failure message for empty output.
pub fn finalize_answer(raw: &str) -> String {
    let answer = raw.trim();
    if answer.is_empty() {
        ANSWER_FAILED.to_string()
    } else {
        answer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_limits_document_context() {
        let document = "a".repeat(40_000);
        let prompt = build_answer_prompt("What is the rent?", &document, "en");
        assert!(prompt.starts_with("Answer the question"));
        assert!(prompt.contains(&"a".repeat(ANSWER_CONTEXT_CHARS)));
        assert!(!prompt.contains(&"a".repeat(ANSWER_CONTEXT_CHARS + 1)));
    }

    #[test]
    fn test_prompt_language_instruction() {
        let prompt = build_answer_prompt("¿Cuál es la renta?", "Contrato", "es");
        assert!(prompt.starts_with("Answer in Spanish.\n"));
        assert!(prompt.contains("Question: ¿Cuál es la renta?"));
    }

    #[test]
    fn test_empty_answer_becomes_failure_message() {
        assert_eq!(finalize_answer("  \n"), ANSWER_FAILED);
        assert_eq!(finalize_answer(" The rent is $900. "), "The rent is $900.");
    }
}

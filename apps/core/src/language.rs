//! Language codes and a local, dictionary-based language detector.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::error::AppError;
use crate::models::DetectedLanguage;

/// Chars of the document inspected by the detector.
const SAMPLE_CHARS: usize = 1000;
const DEFAULT_CONFIDENCE: f32 = 0.5;

static LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("bn", "Bengali"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
    ("ta", "Tamil"),
    ("ur", "Urdu"),
    ("gu", "Gujarati"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("pa", "Punjabi"),
    ("or", "Odia"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("ru", "Russian"),
];

/// English name of a language code; unknown codes map to "English".
pub fn language_name(code: &str) -> &'static str {
    LANGUAGE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("English")
}

pub fn is_supported(code: &str) -> bool {
    LANGUAGE_NAMES.iter().any(|(c, _)| *c == code)
}

/// Detects the language of a document.
#[async_trait]
pub trait LanguageDetector: Send + Sync + 'static {
    async fn detect(&self, text: &str) -> Result<DetectedLanguage, AppError>;
}

struct StopWords {
    code: &'static str,
    words: HashSet<&'static str>,
    accents: &'static [char],
}

static STOP_WORDS: LazyLock<Vec<StopWords>> = LazyLock::new(|| {
    vec![
        StopWords {
            code: "en",
            words: [
                "the", "and", "of", "to", "in", "is", "that", "shall", "be", "for", "with", "this", "by", "any",
            ]
            .into_iter()
            .collect(),
            accents: &[],
        },
        StopWords {
            code: "es",
            words: [
                "el", "los", "las", "del", "y", "por", "con", "para", "una", "es", "contrato", "arrendatario", "se",
            ]
            .into_iter()
            .collect(),
            accents: &['ñ', '¿', '¡', 'á', 'í', 'ó', 'ú'],
        },
        StopWords {
            code: "fr",
            words: [
                "le", "les", "des", "et", "du", "une", "est", "pour", "dans", "avec", "sur", "contrat", "au", "aux",
            ]
            .into_iter()
            .collect(),
            accents: &['ç', 'è', 'ê', 'à', 'ù', 'â', 'î', 'ô'],
        },
        StopWords {
            code: "de",
            words: [
                "der", "die", "das", "und", "ist", "den", "mit", "von", "zu", "ein", "eine", "nicht", "vertrag", "im",
            ]
            .into_iter()
            .collect(),
            accents: &['ä', 'ö', 'ü', 'ß'],
        },
    ]
});

fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Script and stop-word heuristics over the first 1000 chars.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicLanguageDetector;

impl HeuristicLanguageDetector {
    pub fn detect_sync(&self, text: &str) -> DetectedLanguage {
        let sample: String = text.chars().take(SAMPLE_CHARS).collect::<String>().to_lowercase();

        let letters = sample.chars().filter(|c| c.is_alphabetic()).count();
        let devanagari = sample.chars().filter(|c| is_devanagari(*c)).count();
        if letters > 0 && devanagari * 5 >= letters {
            return DetectedLanguage::new("hi", 0.9);
        }

        let words: Vec<&str> = sample
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .collect();

        let mut best: Option<(&'static str, usize)> = None;
        let mut total = 0usize;
        for table in STOP_WORDS.iter() {
            let word_hits = words.iter().filter(|w| table.words.contains(*w)).count();
            let accent_hits = sample.chars().filter(|c| table.accents.contains(c)).count();
            let score = word_hits + accent_hits * 2;
            total += score;
            if score > best.map(|(_, s)| s).unwrap_or(0) {
                best = Some((table.code, score));
            }
        }

        match best {
            Some((code, score)) if total > 0 => {
                let share = score as f32 / total as f32;
                DetectedLanguage::new(code, (0.5 + share * 0.45).min(0.95))
            }
            _ => DetectedLanguage::new("en", DEFAULT_CONFIDENCE),
        }
    }
}

#[async_trait]
impl LanguageDetector for HeuristicLanguageDetector {
    async fn detect(&self, text: &str) -> Result<DetectedLanguage, AppError> {
        Ok(self.detect_sync(text))
    }
}

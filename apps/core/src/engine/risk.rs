//! Tiered keyword risk assessment, independent of the clause type.

use super::clause::RiskCategory;

/// Keywords whose presence makes a clause high risk.
pub static HIGH_RISK_KEYWORDS: &[&str] = &[
    "penalty",
    "forfeit",
    "liability",
    "damages",
    "terminate immediately",
    "breach",
    "violation",
    "liquidated damages",
    "indemnify",
    "default",
    "eviction",
    "foreclosure",
    "legal action",
    "lawsuit",
];

/// Obligation-style keywords.
pub static MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "fee",
    "charge",
    "notice",
    "obligation",
    "must",
    "required",
    "shall",
    "responsible",
    "due",
    "late",
    "interest",
    "repair",
    "maintain",
    "insurance",
    "deposit",
];

/// Optional or discretionary language.
pub static LOW_RISK_KEYWORDS: &[&str] = &[
    "option",
    "may",
    "discretion",
    "suggest",
    "recommend",
    "voluntary",
    "preferred",
    "encouraged",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub score: u8,
    pub category: RiskCategory,
    /// Weighted high-tier total.
    pub high_matches: u32,
    /// Weighted medium-tier total; only computed when no high keyword matched.
    pub medium_matches: u32,
    /// Plain low-tier count; only computed when neither other tier decided.
    pub low_matches: u32,
}

fn weighted_matches(lower: &str, keywords: &[&str], long_len: usize, long: u32, short: u32) -> u32 {
    keywords
        .iter()
        .filter(|kw| lower.contains(**kw))
        .map(|kw| if kw.chars().count() > long_len { long } else { short })
        .sum()
}

/// Scores `clause` on a 1..=5 scale.
///
/// A clause with no keyword from any tier is reported as low risk with score 2.
pub fn assess(clause: &str) -> RiskAssessment {
    let lower = clause.to_lowercase();

    let high_matches = weighted_matches(&lower, HIGH_RISK_KEYWORDS, 8, 3, 2);
    if high_matches > 0 {
        return RiskAssessment {
            score: (3 + high_matches / 2).min(5) as u8,
            category: RiskCategory::High,
            high_matches,
            medium_matches: 0,
            low_matches: 0,
        };
    }

    let medium_matches = weighted_matches(&lower, MEDIUM_RISK_KEYWORDS, 6, 2, 1);
    if medium_matches > 0 {
        let score = if medium_matches > 2 {
            (2 + medium_matches / 3).min(4) as u8
        } else {
            2
        };
        return RiskAssessment {
            score,
            category: RiskCategory::Medium,
            high_matches: 0,
            medium_matches,
            low_matches: 0,
        };
    }

    let low_matches = LOW_RISK_KEYWORDS.iter().filter(|kw| lower.contains(**kw)).count() as u32;
    RiskAssessment {
        score: if low_matches > 0 { 1 } else { 2 },
        category: RiskCategory::Low,
        high_matches: 0,
        medium_matches: 0,
        low_matches,
    }
}

//! Weighted-keyword clause-type classifier.
//!
//! Each type owns a keyword list. A keyword present anywhere in the lowercased clause
//! scores once, weighted by its length. The highest total wins; ties go to the type
//! declared first in [`TAXONOMY`].

use super::clause::ClauseType;

/// Keyword list for one clause type.
pub struct TypeKeywords {
    pub clause_type: ClauseType,
    pub keywords: &'static [&'static str],
}

/// Declaration order is the tie-break order.
pub static TAXONOMY: &[TypeKeywords] = &[
    TypeKeywords {
        clause_type: ClauseType::Termination,
        keywords: &["terminate", "end", "cancel", "expire", "dissolution", "conclude", "cessation"],
    },
    TypeKeywords {
        clause_type: ClauseType::Payment,
        keywords: &[
            "pay", "fee", "cost", "amount", "money", "charge", "bill", "due", "owe", "rent", "price", "installment",
        ],
    },
    TypeKeywords {
        clause_type: ClauseType::Penalty,
        keywords: &["penalty", "fine", "violation", "breach", "forfeit", "damages", "liquidated", "default"],
    },
    TypeKeywords {
        clause_type: ClauseType::Renewal,
        keywords: &["renew", "extend", "automatic", "continue", "successive", "perpetual"],
    },
    TypeKeywords {
        clause_type: ClauseType::Liability,
        keywords: &["liable", "responsible", "damages", "injury", "loss", "indemnify", "hold harmless"],
    },
    TypeKeywords {
        clause_type: ClauseType::Confidentiality,
        keywords: &["confidential", "private", "secret", "disclosure", "proprietary", "non-disclosure"],
    },
    TypeKeywords {
        clause_type: ClauseType::Warranty,
        keywords: &["warrant", "guarantee", "assure", "promise", "represent", "covenant"],
    },
    TypeKeywords {
        clause_type: ClauseType::Insurance,
        keywords: &["insurance", "insure", "coverage", "policy", "premium"],
    },
    TypeKeywords {
        clause_type: ClauseType::Maintenance,
        keywords: &["maintain", "repair", "upkeep", "service", "condition"],
    },
    TypeKeywords {
        clause_type: ClauseType::Use,
        keywords: &["use", "utilize", "occupy", "operate", "employ", "purpose"],
    },
    TypeKeywords {
        clause_type: ClauseType::Notice,
        keywords: &["notice", "notify", "inform", "advise", "communication"],
    },
    TypeKeywords {
        clause_type: ClauseType::Assignment,
        keywords: &["assign", "transfer", "sublease", "sublet", "delegate"],
    },
    TypeKeywords {
        clause_type: ClauseType::Collateral,
        keywords: &[
            "collateral", "security", "pledge", "secure", "shares", "stock", "asset", "guarantee", "pledged",
        ],
    },
    TypeKeywords {
        clause_type: ClauseType::Interest,
        keywords: &["interest", "rate", "annual", "percentage", "accrue", "compound", "calculated"],
    },
    TypeKeywords {
        clause_type: ClauseType::Default,
        keywords: &["default", "failure", "acceleration", "demand", "call", "due immediately"],
    },
    TypeKeywords {
        clause_type: ClauseType::Repayment,
        keywords: &["repay", "repayment", "principal", "balance", "outstanding", "amortization"],
    },
];

const MAX_CONFIDENCE: f32 = 0.95;
const NO_MATCH_CONFIDENCE: f32 = 0.4;

/// Result of classifying one clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub clause_type: ClauseType,
    pub confidence: f32,
    /// Winning keyword score; zero when nothing matched.
    pub score: u32,
}

/// Length-based weight of a matched type keyword.
pub fn keyword_weight(keyword: &str) -> u32 {
    let len = keyword.chars().count();
    if len > 6 {
        3
    } else if len > 4 {
        2
    } else {
        1
    }
}

/// Presence-based score of `entry` against an already-lowercased clause.
pub fn score_type(lower_clause: &str, entry: &TypeKeywords) -> u32 {
    entry
        .keywords
        .iter()
        .filter(|kw| lower_clause.contains(**kw))
        .map(|kw| keyword_weight(kw))
        .sum()
}

/// Classifies `clause` against [`TAXONOMY`].
pub fn classify(clause: &str) -> Classification {
    let lower = clause.to_lowercase();

    let mut best_type = ClauseType::General;
    let mut best_score = 0u32;
    for entry in TAXONOMY {
        let score = score_type(&lower, entry);
        if score > best_score {
            best_score = score;
            best_type = entry.clause_type;
        }
    }

    if best_score == 0 {
        return Classification {
            clause_type: ClauseType::General,
            confidence: NO_MATCH_CONFIDENCE,
            score: 0,
        };
    }

    Classification {
        clause_type: best_type,
        confidence: (0.5 + best_score as f32 * 0.08).min(MAX_CONFIDENCE),
        score: best_score,
    }
}

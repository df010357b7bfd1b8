//! Fixed question and explanation tables keyed by clause type.

use super::clause::{ClauseType, RiskCategory};

/// Document-level questions used when generated questions are unavailable.
pub static FALLBACK_DOCUMENT_QUESTIONS: [&str; 4] = [
    "What are the main costs and fees mentioned?",
    "How can this agreement be terminated?",
    "What penalties apply if I don't follow the terms?",
    "What are my key rights and obligations?",
];

const GENERAL_QUESTIONS: [&str; 2] = [
    "What are the most important terms I should understand?",
    "What obligations do I have under this agreement?",
];

/// Two suggested questions for a clause of type `clause_type`.
///
/// Types without a dedicated pair get the general pair.
pub fn questions_for_type(clause_type: ClauseType) -> [&'static str; 2] {
    match clause_type {
        ClauseType::Termination => [
            "How do I properly end this agreement?",
            "What notice period is required to terminate?",
        ],
        ClauseType::Payment => ["When exactly are payments due?", "What happens if I miss a payment?"],
        ClauseType::Penalty => [
            "What specific actions trigger penalties?",
            "How much will I owe if I violate this?",
        ],
        ClauseType::Renewal => ["Does this automatically renew?", "How do I prevent automatic renewal?"],
        ClauseType::Liability => [
            "What am I financially responsible for?",
            "Are there limits on my liability?",
        ],
        ClauseType::Confidentiality => [
            "What information must I keep private?",
            "How long does confidentiality last?",
        ],
        ClauseType::Warranty => [
            "What exactly is guaranteed?",
            "What happens if the warranty is broken?",
        ],
        ClauseType::Collateral => [
            "What exactly am I pledging as collateral?",
            "Can the lender take my collateral if I default?",
        ],
        ClauseType::Interest => [
            "What is the exact interest rate?",
            "How is interest calculated and when is it due?",
        ],
        ClauseType::Default => [
            "What counts as being in default?",
            "What are the immediate consequences of default?",
        ],
        ClauseType::Repayment => [
            "What is the exact payment schedule?",
            "Can I pay off the loan early without penalty?",
        ],
        _ => GENERAL_QUESTIONS,
    }
}

/// One-sentence description of what a clause of this type governs.
fn type_explanation(clause_type: ClauseType) -> &'static str {
    match clause_type {
        ClauseType::Termination => "This clause sets out how and when the agreement can end.",
        ClauseType::Payment => "This clause describes amounts to be paid and when they fall due.",
        ClauseType::Penalty => "This clause lists consequences for breaking the terms of the agreement.",
        ClauseType::Renewal => "This clause controls whether and how the agreement continues past its term.",
        ClauseType::Liability => "This clause allocates responsibility for losses, damage or injury.",
        ClauseType::Confidentiality => "This clause restricts what information may be shared and with whom.",
        ClauseType::Warranty => "This clause records promises and guarantees made by a party.",
        ClauseType::Insurance => "This clause sets insurance coverage a party must obtain or keep.",
        ClauseType::Maintenance => "This clause assigns upkeep and repair duties.",
        ClauseType::Use => "This clause limits how the property, goods or service may be used.",
        ClauseType::Notice => "This clause explains how formal notices must be given.",
        ClauseType::Assignment => "This clause governs transferring rights or obligations to someone else.",
        ClauseType::Collateral => "This clause identifies assets pledged to secure an obligation.",
        ClauseType::Interest => "This clause sets how interest is charged on amounts owed.",
        ClauseType::Default => "This clause defines what counts as a default and what follows from it.",
        ClauseType::Repayment => "This clause fixes the schedule for paying back borrowed money.",
        ClauseType::General => "This clause contains general terms of the agreement.",
    }
}

fn risk_sentence(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::High => "It contains language that can lead to penalties or legal exposure; review it carefully.",
        RiskCategory::Medium => "It creates obligations or charges you should keep track of.",
        RiskCategory::Low => "It carries little direct risk on its own.",
    }
}

/// Deterministic explanation combining the clause type and risk category.
pub fn explanation_for(clause_type: ClauseType, category: RiskCategory) -> String {
    format!("{} {}", type_explanation(clause_type), risk_sentence(category))
}

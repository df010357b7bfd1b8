//! # Key-Term Extraction
//!
//! Four independent, stateless passes over the raw document text:
//! - `financial`: currency amounts with a subtype (rent, deposit, payment)
//! - `dates`: multilingual date mentions with a localized subtype label
//! - `notice`: notice and grace periods
//! - `penalty`: penalty mentions with severity and amounts
//!
//! Each pass deduplicates with its own key; see the individual modules.

pub mod context;
pub mod dates;
pub mod financial;
pub mod locale;
pub mod notice;
pub mod penalty;

use serde::{Deserialize, Serialize};

pub use dates::{extract_date_terms, DateKind, DateTerm};
pub use financial::{extract_financial_terms, FinancialTerm, FinancialType};
pub use notice::{extract_notice_periods, NoticeTerm, NoticeType};
pub use penalty::{extract_penalties, PenaltyTerm};

/// One extracted term, tagged by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ExtractedTerm {
    Financial(FinancialTerm),
    Date(DateTerm),
    Notice(NoticeTerm),
    Penalty(PenaltyTerm),
}

/// Output of all four passes for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTerms {
    pub financial: Vec<FinancialTerm>,
    pub dates: Vec<DateTerm>,
    pub notices: Vec<NoticeTerm>,
    pub penalties: Vec<PenaltyTerm>,
}

impl KeyTerms {
    /// Runs every pass sequentially on the calling thread.
    pub fn extract(text: &str, language: &str) -> Self {
        Self {
            financial: extract_financial_terms(text),
            dates: extract_date_terms(text, language),
            notices: extract_notice_periods(text, language),
            penalties: extract_penalties(text, language),
        }
    }

    pub fn len(&self) -> usize {
        self.financial.len() + self.dates.len() + self.notices.len() + self.penalties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the four lists into tagged terms, category by category.
    pub fn to_terms(&self) -> Vec<ExtractedTerm> {
        self.financial
            .iter()
            .cloned()
            .map(ExtractedTerm::Financial)
            .chain(self.dates.iter().cloned().map(ExtractedTerm::Date))
            .chain(self.notices.iter().cloned().map(ExtractedTerm::Notice))
            .chain(self.penalties.iter().cloned().map(ExtractedTerm::Penalty))
            .collect()
    }
}

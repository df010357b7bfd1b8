//! ClauseLens core: clause segmentation, classification, risk scoring and key-term
//! extraction for legal documents, with optional generative summaries and questions.

pub mod actors;
pub mod config;
pub mod engine;
pub mod error;
pub mod generative;
pub mod language;
pub mod models;
pub mod resilience;
pub mod telemetry;
pub mod terms;
pub mod text_extract;

#[cfg(test)]
mod tests;

pub use actors::SupervisorHandle;
pub use config::EngineConfig;
pub use error::AppError;
pub use models::DocumentReport;

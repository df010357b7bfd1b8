use tokio::sync::oneshot;

use crate::models::DocumentReport;

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `LlmActor`.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request to generate a complete text response with specific parameters.
    GenerateWithParams {
        prompt: String,
        system_prompt: Option<String>,
        temperature: Option<f32>,
        /// A channel to send the final `String` result back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Extract the text of an uploaded file, then analyze it.
    AnalyzeDocument {
        file_name: String,
        bytes: Vec<u8>,
        /// Skips language detection when set.
        language_hint: Option<String>,
        responder: oneshot::Sender<Result<DocumentReport, AppError>>,
    },
    /// Analyze already extracted text.
    AnalyzeText {
        text: String,
        language_hint: Option<String>,
        /// Local analysis never fails, so the report is sent directly.
        responder: oneshot::Sender<DocumentReport>,
    },
    /// Answer a question about a document. Always answers, falling back to a fixed message.
    AnswerQuestion {
        question: String,
        document_text: String,
        language: String,
        responder: oneshot::Sender<String>,
    },
    /// A command to stop the supervisor. Requests already in flight still complete.
    Shutdown,
}

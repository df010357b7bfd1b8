use crate::actors::messages::AppError;
use async_trait::async_trait;

/// Defines the public interface for a generative-model client.
///
/// This trait abstracts the completion backend so the pipeline can run against a
/// llama.cpp-compatible server in production and against mocks in tests.
#[async_trait]
pub trait LlmActor: Send + Sync + 'static {
    /// Generates a complete text response based on a prompt and optional parameters.
    async fn generate_with_params(
        &self,
        prompt: String,
        system_prompt: Option<String>,
        temperature: Option<f32>,
    ) -> Result<String, AppError>;
}

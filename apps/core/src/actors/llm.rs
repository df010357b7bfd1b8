use crate::actors::messages::{AppError, LlmMessage};
use crate::actors::traits::LlmActor;
use crate::config::EngineConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use url::Url;
use tracing::{info, warn};

/// A handle to the `LlmActor`.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running LLM actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
}

impl LlmActorHandle {
    /// Creates a new `LlmActor` and returns a handle to it.
    ///
    /// This will spawn the `LlmActorRunner` in a new Tokio task.
    ///
    /// # Arguments
    ///
    /// * `server_url` - Base URL of a llama.cpp-compatible completion server.
    /// * `auth_token` - Optional bearer token sent with every request.
    /// * `max_tokens` - Completion length (`n_predict`).
    /// * `temperature` - Sampling temperature used when a request does not set one.
    pub fn new(server_url: String, auth_token: Option<String>, max_tokens: u32, temperature: f32) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let client = CompletionClient {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            auth_token,
            max_tokens,
            temperature,
        };
        let actor = LlmActorRunner { receiver, client };
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }

    /// Builds the actor from configuration. Returns `None` when no server URL is set.
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        config.llm_url.as_ref().map(|url| {
            Self::new(
                url.clone(),
                config.auth_token.clone(),
                config.max_tokens,
                config.temperature,
            )
        })
    }

    /// A convenience method for generating text with default parameters.
    pub async fn generate(&self, prompt: String) -> Result<String, AppError> {
        self.generate_with_params(prompt, None, None).await
    }
}

#[async_trait]
impl LlmActor for LlmActorHandle {
    async fn generate_with_params(
        &self,
        prompt: String,
        system_prompt: Option<String>,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::GenerateWithParams {
            prompt,
            system_prompt,
            temperature,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(REPLY_TIMEOUT, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }
}

// --- Constants ---
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);
const REPLY_TIMEOUT: Duration = Duration::from_secs(130);

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    client: CompletionClient,
}

impl LlmActorRunner {
    async fn run(mut self) {
        info!(server_url = %self.client.server_url, "LlmActor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }

        info!("LlmActor stopped");
    }

    /// Each request runs on its own task so a summary and a question list can be
    /// generated at the same time.
    fn handle_message(&self, msg: LlmMessage) {
        match msg {
            LlmMessage::GenerateWithParams {
                prompt,
                system_prompt,
                temperature,
                responder,
            } => {
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client.generate_completion(prompt, system_prompt, temperature).await;
                    let _ = responder.send(result);
                });
            }
        }
    }
}

#[derive(Clone)]
struct CompletionClient {
    http: Client,
    server_url: String,
    auth_token: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl CompletionClient {
    fn build_request(&self, endpoint: &str, payload: &serde_json::Value) -> Result<reqwest::RequestBuilder, AppError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.auth_token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AppError::Config(format!("Invalid LLAMA_AUTH_TOKEN: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        let url = Url::parse(&format!("{}/{}", self.server_url, endpoint))?;
        Ok(self.http.post(url).headers(headers).json(payload))
    }

    async fn generate_completion(
        &self,
        prompt: String,
        system_prompt: Option<String>,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        info!(prompt_len = prompt.len(), "LLM generating completion");

        let mut payload = serde_json::json!({
            "prompt": prompt,
            "stream": false,
            "n_predict": self.max_tokens,
            "temperature": temperature.unwrap_or(self.temperature),
        });

        if let Some(system) = system_prompt {
            payload["system_prompt"] = serde_json::Value::String(system);
        }

        let request_future = self.build_request("completion", &payload)?.send();

        let res = timeout(COMPLETION_TIMEOUT, request_future).await??;

        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, "Completion request rejected");
            return Err(AppError::Generation(format!(
                "Completion request failed with status {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("Malformed completion response: {}", e)))?;

        let content = json["content"].as_str().unwrap_or("").to_string();
        info!(content_len = content.len(), "LLM completion received");
        Ok(content)
    }
}

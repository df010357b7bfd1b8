//! Engine configuration, read from the process environment (and `.env` when present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::resilience::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY};

/// The external calls that get their own timeout and retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalCall {
    Extraction,
    Language,
    Summary,
    Questions,
    Answer,
}

impl ExternalCall {
    fn env_prefix(&self) -> &'static str {
        match self {
            ExternalCall::Extraction => "CLAUSELENS_EXTRACTION",
            ExternalCall::Language => "CLAUSELENS_LANGUAGE",
            ExternalCall::Summary => "CLAUSELENS_SUMMARY",
            ExternalCall::Questions => "CLAUSELENS_QUESTIONS",
            ExternalCall::Answer => "CLAUSELENS_ANSWER",
        }
    }

    fn default_budget(&self) -> CallBudget {
        let (ms, retries) = match self {
            ExternalCall::Extraction => (45_000, 1),
            ExternalCall::Language => (10_000, 2),
            ExternalCall::Summary => (30_000, 1),
            ExternalCall::Questions => (25_000, 1),
            ExternalCall::Answer => (10_000, 1),
        };
        CallBudget {
            timeout: Duration::from_millis(ms),
            retries,
        }
    }
}

/// Timeout and retry count for one external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallBudget {
    pub timeout: Duration,
    pub retries: u32,
}

/// Runtime configuration for the document pipeline.
#[derive(Debug, Clone, Validate)]
pub struct EngineConfig {
    /// Base URL of the completion server. `None` disables every generative call.
    #[validate(url)]
    pub llm_url: Option<String>,
    pub auth_token: Option<String>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    pub backoff_base: Duration,
    pub backoff_cap: Duration,
    pub extraction: CallBudget,
    pub language: CallBudget,
    pub summary: CallBudget,
    pub questions: CallBudget,
    pub answer: CallBudget,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            llm_url: None,
            auth_token: None,
            temperature: 0.2,
            max_tokens: 1024,
            backoff_base: DEFAULT_BASE_DELAY,
            backoff_cap: DEFAULT_MAX_DELAY,
            extraction: ExternalCall::Extraction.default_budget(),
            language: ExternalCall::Language.default_budget(),
            summary: ExternalCall::Summary.default_budget(),
            questions: ExternalCall::Questions.default_budget(),
            answer: ExternalCall::Answer.default_budget(),
        }
    }
}

impl EngineConfig {
    /// Loads `.env` if one exists, then reads every `CLAUSELENS_*` variable.
    pub fn from_env() -> Result<Self, AppError> {
        if dotenv::dotenv().is_ok() {
            info!("Loaded environment overrides from .env");
        }
        Self::from_process_env()
    }

    /// Reads configuration from the current process environment only.
    pub fn from_process_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            llm_url: read_string("CLAUSELENS_LLM_URL"),
            auth_token: read_string("LLAMA_AUTH_TOKEN"),
            temperature: read_parsed("CLAUSELENS_TEMPERATURE", defaults.temperature)?,
            max_tokens: read_parsed("CLAUSELENS_MAX_TOKENS", defaults.max_tokens)?,
            backoff_base: read_millis("CLAUSELENS_BACKOFF_BASE_MS", defaults.backoff_base)?,
            backoff_cap: read_millis("CLAUSELENS_BACKOFF_CAP_MS", defaults.backoff_cap)?,
            extraction: read_budget(ExternalCall::Extraction)?,
            language: read_budget(ExternalCall::Language)?,
            summary: read_budget(ExternalCall::Summary)?,
            questions: read_budget(ExternalCall::Questions)?,
            answer: read_budget(ExternalCall::Answer)?,
        };

        config.validate()?;
        if config.backoff_base > config.backoff_cap {
            return Err(AppError::Config(format!(
                "CLAUSELENS_BACKOFF_BASE_MS ({}ms) exceeds CLAUSELENS_BACKOFF_CAP_MS ({}ms)",
                config.backoff_base.as_millis(),
                config.backoff_cap.as_millis()
            )));
        }

        info!(
            generation_enabled = config.generation_enabled(),
            "Engine configuration loaded"
        );
        Ok(config)
    }

    pub fn generation_enabled(&self) -> bool {
        self.llm_url.is_some()
    }

    pub fn budget(&self, call: ExternalCall) -> CallBudget {
        match call {
            ExternalCall::Extraction => self.extraction,
            ExternalCall::Language => self.language,
            ExternalCall::Summary => self.summary,
            ExternalCall::Questions => self.questions,
            ExternalCall::Answer => self.answer,
        }
    }

    /// The retry policy for `call`, with this configuration's backoff curve.
    pub fn policy(&self, call: ExternalCall) -> RetryPolicy {
        let budget = self.budget(call);
        RetryPolicy::new(budget.timeout, budget.retries).with_backoff(self.backoff_base, self.backoff_cap)
    }
}

fn read_string(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn read_parsed<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match read_string(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("{} has invalid value '{}': {}", name, raw, e))),
    }
}

fn read_millis(name: &str, default: Duration) -> Result<Duration, AppError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    read_parsed(name, default_ms).map(Duration::from_millis)
}

fn read_budget(call: ExternalCall) -> Result<CallBudget, AppError> {
    let defaults = call.default_budget();
    let prefix = call.env_prefix();
    Ok(CallBudget {
        timeout: read_millis(&format!("{}_TIMEOUT_MS", prefix), defaults.timeout)?,
        retries: read_parsed(&format!("{}_RETRIES", prefix), defaults.retries)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 6] = [
        "CLAUSELENS_LLM_URL",
        "LLAMA_AUTH_TOKEN",
        "CLAUSELENS_TEMPERATURE",
        "CLAUSELENS_MAX_TOKENS",
        "CLAUSELENS_BACKOFF_BASE_MS",
        "CLAUSELENS_BACKOFF_CAP_MS",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS.iter().map(|v| (*v, None)).collect()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        temp_env::with_vars(cleared(), || {
            let config = EngineConfig::from_process_env().expect("defaults are valid");
            assert!(!config.generation_enabled());
            assert_eq!(config.summary.timeout, Duration::from_millis(30_000));
            assert_eq!(config.language.retries, 2);
            assert_eq!(config.policy(ExternalCall::Extraction).retries, 1);
        });
    }

    #[test]
    fn test_reads_url_and_budget_overrides() {
        temp_env::with_vars(
            [
                ("CLAUSELENS_LLM_URL", Some("http://127.0.0.1:8080")),
                ("CLAUSELENS_SUMMARY_TIMEOUT_MS", Some("1500")),
                ("CLAUSELENS_SUMMARY_RETRIES", Some("0")),
            ],
            || {
                let config = EngineConfig::from_process_env().expect("valid overrides");
                assert!(config.generation_enabled());
                let policy = config.policy(ExternalCall::Summary);
                assert_eq!(policy.timeout, Duration::from_millis(1500));
                assert_eq!(policy.attempts(), 1);
            },
        );
    }

    #[test]
    fn test_rejects_unparseable_number() {
        temp_env::with_var("CLAUSELENS_MAX_TOKENS", Some("lots"), || {
            let result = EngineConfig::from_process_env();
            assert!(matches!(result, Err(AppError::Config(_))));
        });
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        temp_env::with_var("CLAUSELENS_TEMPERATURE", Some("3.5"), || {
            assert!(EngineConfig::from_process_env().is_err());
        });
    }

    #[test]
    fn test_rejects_invalid_url() {
        temp_env::with_var("CLAUSELENS_LLM_URL", Some("not a url"), || {
            assert!(matches!(EngineConfig::from_process_env(), Err(AppError::Config(_))));
        });
    }
}

//! Actor System Tests
//!
//! Tests for the document pipeline and the Supervisor actor, driven through mock
//! collaborators, plus one end-to-end run against a mocked completion server.

use crate::actors::llm::LlmActorHandle;
use crate::actors::messages::AppError;
use crate::actors::supervisor::{DocumentPipeline, SupervisorHandle};
use crate::actors::traits::LlmActor;
use crate::config::{CallBudget, EngineConfig};
use crate::generative::{fallback_questions, ANSWER_FAILED, ANSWER_UNAVAILABLE};
use crate::language::{HeuristicLanguageDetector, LanguageDetector};
use crate::models::{DetectedLanguage, QuestionSource, SummarySource};
use crate::text_extract::{LocalTextExtractor, TextExtractor};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};

const LEASE: &str = "RESIDENTIAL LEASE AGREEMENT

This Lease Agreement is made between Acme Properties LLC (the Landlord) and Jane Doe (the Tenant).

1. RENT. The Tenant shall pay monthly rent of $1,200 on or before the first day of each month.

2. SECURITY DEPOSIT. The Tenant shall pay a security deposit of $2,400 before moving in.

3. LATE FEES. If rent is not received within 5 days of the due date, a late fee of $50 will be charged.

4. TERMINATION. Either party may terminate this lease by giving 30 days written notice.
";

const SUMMARY_REPLY: &str = "Main Facts:
- **Document Type:** Lease
- **Monthly Rent/Payment:** $1,200

## Parties Involved
- Landlord: Acme Properties LLC
- Tenant: Jane Doe

## Risks and Penalties
- A late fee of $50 applies after five days";

const QUESTIONS_REPLY: &str = "```json
{\"questions\": [\"What is the monthly rent amount?\", \"When is the security deposit returned?\", \"How much notice ends the lease?\", \"What happens if rent is paid late?\"]}
```";

/// Marker that only the question-generation prompt contains.
const QUESTIONS_PROMPT_MARKER: &str = "specific, practical questions";

// ============================================================================
// Mock Collaborators for Testing
// ============================================================================

/// Mock LLM Actor that returns predictable responses
pub struct MockLlmActor {
    pub response: String,
    pub questions_response: Option<String>,
    pub delay_ms: u64,
    pub should_fail: bool,
    pub calls: AtomicUsize,
}

impl MockLlmActor {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            questions_response: None,
            delay_ms: 0,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answers question-generation prompts with `response` instead.
    pub fn with_questions(mut self, response: &str) -> Self {
        self.questions_response = Some(response.to_string());
        self
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmActor for MockLlmActor {
    async fn generate_with_params(
        &self,
        prompt: String,
        _system_prompt: Option<String>,
        _temperature: Option<f32>,
    ) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        if self.should_fail {
            return Err(AppError::Generation("Mock failure".to_string()));
        }
        match &self.questions_response {
            Some(questions) if prompt.contains(QUESTIONS_PROMPT_MARKER) => Ok(questions.clone()),
            _ => Ok(self.response.clone()),
        }
    }
}

/// Mock extractor that always fails
pub struct FailingExtractor {
    pub calls: AtomicUsize,
}

impl FailingExtractor {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextExtractor for FailingExtractor {
    async fn extract(&self, file_name: String, _bytes: Vec<u8>) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Extraction(format!("{} is password protected", file_name)))
    }
}

/// Mock language detector with a fixed answer, or a failure when `None`
pub struct MockLanguageDetector {
    pub code: Option<&'static str>,
}

#[async_trait]
impl LanguageDetector for MockLanguageDetector {
    async fn detect(&self, _text: &str) -> Result<DetectedLanguage, AppError> {
        match self.code {
            Some(code) => Ok(DetectedLanguage::new(code, 0.9)),
            None => Err(AppError::Generation("Mock detector failure".to_string())),
        }
    }
}

/// Millisecond budgets with a single retry, so fallback paths resolve quickly.
fn fast_config() -> EngineConfig {
    let budget = CallBudget {
        timeout: Duration::from_millis(200),
        retries: 1,
    };
    EngineConfig {
        backoff_base: Duration::from_millis(1),
        backoff_cap: Duration::from_millis(2),
        extraction: budget,
        language: budget,
        summary: budget,
        questions: budget,
        answer: budget,
        ..EngineConfig::default()
    }
}

fn pipeline_with_llm(
    llm: MockLlmActor,
) -> (DocumentPipeline<MockLlmActor, LocalTextExtractor, HeuristicLanguageDetector>, Arc<MockLlmActor>) {
    let llm = Arc::new(llm);
    let pipeline = DocumentPipeline::new(
        fast_config(),
        Some(Arc::clone(&llm)),
        Arc::new(LocalTextExtractor),
        Arc::new(HeuristicLanguageDetector),
    );
    (pipeline, llm)
}

fn pipeline_without_llm() -> DocumentPipeline<MockLlmActor, LocalTextExtractor, HeuristicLanguageDetector> {
    DocumentPipeline::new(
        fast_config(),
        None,
        Arc::new(LocalTextExtractor),
        Arc::new(HeuristicLanguageDetector),
    )
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_summary_and_questions() {
        let (pipeline, llm) = pipeline_with_llm(MockLlmActor::new(SUMMARY_REPLY).with_questions(QUESTIONS_REPLY));

        let report = pipeline
            .analyze_text(LEASE.to_string(), Some("en".to_string()), None)
            .await;

        assert_eq!(report.summary_source, SummarySource::Generated);
        assert_eq!(report.question_source, QuestionSource::Generated);
        assert_eq!(report.summary, SUMMARY_REPLY);
        assert_eq!(report.summary_sections.len(), 2);
        assert_eq!(report.summary_sections[0].title, "Parties Involved");
        assert_eq!(report.questions[0], "What is the monthly rent amount?");
        assert_eq!(report.questions.len(), 4);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_local_analysis_fills_the_report() {
        let report = pipeline_without_llm()
            .analyze_text(LEASE.to_string(), Some("en".to_string()), None)
            .await;

        assert_eq!(report.language, DetectedLanguage::new("en", 1.0));
        assert_eq!(report.text_length, LEASE.chars().count());
        assert!(report.clauses.len() >= 4);
        assert!(report.max_risk_score().is_some());
        let amounts: Vec<&str> = report.key_terms.financial.iter().map(|t| t.amount.as_str()).collect();
        assert!(amounts.contains(&"$1,200"), "amounts: {:?}", amounts);
        assert!(amounts.contains(&"$2,400"), "amounts: {:?}", amounts);
        assert!(!report.key_terms.notices.is_empty());
        assert_eq!(uuid::Uuid::parse_str(&report.id).map(|id| id.get_version_num()).ok(), Some(4));
    }

    #[tokio::test]
    async fn test_unstructured_replies_fall_back_after_retries() {
        let (pipeline, llm) = pipeline_with_llm(MockLlmActor::new("This lease looks fine to me."));

        let report = pipeline
            .analyze_text(LEASE.to_string(), Some("en".to_string()), None)
            .await;

        assert_eq!(report.summary_source, SummarySource::Fallback);
        assert_eq!(report.question_source, QuestionSource::Fallback);
        assert!(report.summary.starts_with("Main Facts:"));
        assert_eq!(report.summary_sections.len(), 4);
        assert_eq!(report.questions, fallback_questions());
        // One retry each for summary and questions.
        assert_eq!(llm.call_count(), 4);
    }

    #[tokio::test]
    async fn test_failing_llm_still_produces_a_report() {
        let (pipeline, _llm) = pipeline_with_llm(MockLlmActor::failing());

        let report = pipeline
            .analyze_text(LEASE.to_string(), Some("en".to_string()), None)
            .await;

        assert_eq!(report.summary_source, SummarySource::Fallback);
        assert_eq!(report.question_source, QuestionSource::Fallback);
        assert!(!report.clauses.is_empty());
    }

    #[tokio::test]
    async fn test_slow_llm_is_abandoned_within_budget() {
        let (pipeline, _llm) = pipeline_with_llm(MockLlmActor::new(SUMMARY_REPLY).with_delay(5_000));
        let started = Instant::now();

        let report = pipeline
            .analyze_text(LEASE.to_string(), Some("en".to_string()), None)
            .await;

        assert_eq!(report.summary_source, SummarySource::Fallback);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_empty_text_degrades_gracefully() {
        let report = pipeline_without_llm()
            .analyze_text(String::new(), Some("en".to_string()), None)
            .await;

        assert_eq!(report.clauses.len(), 1);
        assert!(report.key_terms.is_empty());
        assert_eq!(report.text_length, 0);
    }
}

#[cfg(test)]
mod language_tests {
    use super::*;

    #[tokio::test]
    async fn test_detector_failure_defaults_to_english() {
        let pipeline = DocumentPipeline::new(
            fast_config(),
            None::<Arc<MockLlmActor>>,
            Arc::new(LocalTextExtractor),
            Arc::new(MockLanguageDetector { code: None }),
        );

        let report = pipeline.analyze_text(LEASE.to_string(), None, None).await;
        assert_eq!(report.language, DetectedLanguage::new("en", 0.5));
    }

    #[tokio::test]
    async fn test_unsupported_hint_falls_back_to_detection() {
        let pipeline = DocumentPipeline::new(
            fast_config(),
            None::<Arc<MockLlmActor>>,
            Arc::new(LocalTextExtractor),
            Arc::new(MockLanguageDetector { code: Some("es") }),
        );

        let report = pipeline
            .analyze_text(LEASE.to_string(), Some("tlh".to_string()), None)
            .await;
        assert_eq!(report.language, DetectedLanguage::new("es", 0.9));
    }

    #[tokio::test]
    async fn test_hint_is_normalized() {
        let report = pipeline_without_llm()
            .analyze_text(LEASE.to_string(), Some(" FR ".to_string()), None)
            .await;
        assert_eq!(report.language.code, "fr");
    }
}

#[cfg(test)]
mod document_tests {
    use super::*;

    #[tokio::test]
    async fn test_analyze_uploaded_text_file() {
        let report = pipeline_without_llm()
            .analyze_document("lease.txt".to_string(), LEASE.as_bytes().to_vec(), Some("en".to_string()))
            .await
            .unwrap();

        assert_eq!(report.file_name.as_deref(), Some("lease.txt"));
        assert!(!report.key_terms.financial.is_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_is_retried_then_reported() {
        let extractor = Arc::new(FailingExtractor::new());
        let pipeline = DocumentPipeline::new(
            fast_config(),
            None::<Arc<MockLlmActor>>,
            Arc::clone(&extractor),
            Arc::new(HeuristicLanguageDetector),
        );

        let result = pipeline
            .analyze_document("scan.pdf".to_string(), vec![1, 2, 3], None)
            .await;

        match result {
            Err(AppError::Extraction(message)) => assert!(message.contains("scan.pdf")),
            other => panic!("expected extraction error, got {:?}", other.map(|r| r.id)),
        }
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 2);
    }
}

#[cfg(test)]
mod answer_tests {
    use super::*;

    #[tokio::test]
    async fn test_answer_without_llm() {
        let answer = pipeline_without_llm()
            .answer_question("What is the rent?".to_string(), LEASE.to_string(), "en".to_string())
            .await;
        assert_eq!(answer, ANSWER_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_answer_with_failing_llm() {
        let (pipeline, llm) = pipeline_with_llm(MockLlmActor::failing());
        let answer = pipeline
            .answer_question("What is the rent?".to_string(), LEASE.to_string(), "en".to_string())
            .await;
        assert_eq!(answer, ANSWER_FAILED);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_answer_is_trimmed() {
        let (pipeline, _llm) = pipeline_with_llm(MockLlmActor::new("  The monthly rent is $1,200.\n"));
        let answer = pipeline
            .answer_question("What is the rent?".to_string(), LEASE.to_string(), "en".to_string())
            .await;
        assert_eq!(answer, "The monthly rent is $1,200.");
    }
}

// ============================================================================
// Supervisor Actor Tests
// ============================================================================

#[cfg(test)]
mod supervisor_tests {
    use super::*;

    fn supervisor_with(llm: MockLlmActor) -> SupervisorHandle {
        SupervisorHandle::with_collaborators(
            fast_config(),
            Some(Arc::new(llm)),
            Arc::new(LocalTextExtractor),
            Arc::new(HeuristicLanguageDetector),
        )
    }

    #[tokio::test]
    async fn test_supervisor_analyzes_text() {
        let supervisor = supervisor_with(MockLlmActor::new(SUMMARY_REPLY).with_questions(QUESTIONS_REPLY));

        let report = supervisor
            .analyze_text(LEASE.to_string(), Some("en".to_string()))
            .await
            .unwrap();

        assert_eq!(report.summary_source, SummarySource::Generated);
        assert_eq!(report.question_source, QuestionSource::Generated);
        supervisor.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_supervisor_serves_requests_concurrently() {
        let supervisor = supervisor_with(MockLlmActor::new(SUMMARY_REPLY).with_questions(QUESTIONS_REPLY).with_delay(50));

        let (first, second, answer) = tokio::join!(
            supervisor.analyze_text(LEASE.to_string(), Some("en".to_string())),
            supervisor.analyze_document("lease.md".to_string(), LEASE.as_bytes().to_vec(), None),
            supervisor.answer_question("Who is the tenant?".to_string(), LEASE.to_string(), "en".to_string()),
        );

        assert!(first.is_ok());
        assert_eq!(second.unwrap().file_name.as_deref(), Some("lease.md"));
        assert_eq!(answer.unwrap(), SUMMARY_REPLY);
    }

    #[tokio::test]
    async fn test_supervisor_reports_extraction_errors() {
        let supervisor = SupervisorHandle::with_collaborators(
            fast_config(),
            None::<Arc<MockLlmActor>>,
            Arc::new(FailingExtractor::new()),
            Arc::new(HeuristicLanguageDetector),
        );

        let result = supervisor
            .analyze_document("scan.pdf".to_string(), vec![0u8; 16], None)
            .await;
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_requests_after_shutdown_fail() {
        let supervisor = supervisor_with(MockLlmActor::new(SUMMARY_REPLY));
        supervisor.shutdown().await.unwrap();
        sleep(Duration::from_millis(20)).await;

        let result = supervisor
            .analyze_text(LEASE.to_string(), Some("en".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::Actor(_))));
    }
}

// ============================================================================
// End-to-End with a Mocked Completion Server
// ============================================================================

#[cfg(test)]
mod completion_server_tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_report_generated_through_http_llm() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/completion"))
            .and(body_string_contains(QUESTIONS_PROMPT_MARKER))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": QUESTIONS_REPLY })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/completion"))
            .and(body_string_contains("Summarize the legal document"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": SUMMARY_REPLY })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = fast_config();
        config.llm_url = Some(mock_server.uri());
        let supervisor = SupervisorHandle::new(config);

        let report = supervisor
            .analyze_text(LEASE.to_string(), Some("en".to_string()))
            .await
            .unwrap();

        assert_eq!(report.summary_source, SummarySource::Generated);
        assert_eq!(report.question_source, QuestionSource::Generated);
        assert_eq!(report.questions[3], "What happens if rent is paid late?");
        supervisor.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_server_errors_fall_back_locally() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completion"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .mount(&mock_server)
            .await;

        let llm = Arc::new(LlmActorHandle::new(mock_server.uri(), None, 256, 0.2));
        let pipeline = DocumentPipeline::new(
            fast_config(),
            Some(llm),
            Arc::new(LocalTextExtractor),
            Arc::new(HeuristicLanguageDetector),
        );

        let report = pipeline
            .analyze_text(LEASE.to_string(), Some("en".to_string()), None)
            .await;
        assert_eq!(report.summary_source, SummarySource::Fallback);
        assert_eq!(report.question_source, QuestionSource::Fallback);

        let answer = pipeline
            .answer_question("What is the rent?".to_string(), LEASE.to_string(), "en".to_string())
            .await;
        assert_eq!(answer, ANSWER_FAILED);
    }
}

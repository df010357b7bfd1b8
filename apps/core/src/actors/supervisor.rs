use crate::actors::llm::LlmActorHandle;
use crate::actors::messages::{AppError, SupervisorMessage};
use crate::actors::traits::LlmActor;
use crate::config::{EngineConfig, ExternalCall};
use crate::engine::analyzer::document_fallback;
use crate::engine::{detect_document_type, Clause, ClauseAnalyzer, DocumentType};
use crate::generative::answer::finalize_answer;
use crate::generative::{
    build_answer_prompt, build_questions_prompt, build_summary_prompt, fallback_questions, fallback_summary,
    parse_generated_questions, parse_summary_sections, validate_summary, ANSWER_FAILED, ANSWER_UNAVAILABLE,
};
use crate::language::{is_supported, HeuristicLanguageDetector, LanguageDetector};
use crate::models::{DetectedLanguage, DocumentReport, QuestionSource, SummarySource};
use crate::resilience::with_retry;
use crate::terms::{extract_date_terms, extract_financial_terms, extract_notice_periods, extract_penalties, KeyTerms};
use crate::text_extract::{LocalTextExtractor, TextExtractor};
use chrono::Utc;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{info, instrument, warn};

/// Time allowed for the local passes on top of the external-call budgets.
const LOCAL_ANALYSIS_ALLOWANCE: Duration = Duration::from_secs(30);
const REPLY_MARGIN: Duration = Duration::from_secs(5);

/// A handle to the `SupervisorActor`.
///
/// This is the single entry point of the engine. It owns the document pipeline and
/// delegates generative calls to the `LlmActor` when one is configured.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    deadlines: ReplyDeadlines,
}

/// How long the handle waits for each kind of reply, derived from the call budgets.
#[derive(Debug, Clone, Copy)]
struct ReplyDeadlines {
    text: Duration,
    document: Duration,
    answer: Duration,
}

impl ReplyDeadlines {
    fn from_config(config: &EngineConfig) -> Self {
        let generation = config
            .policy(ExternalCall::Summary)
            .worst_case()
            .max(config.policy(ExternalCall::Questions).worst_case());
        let text = config
            .policy(ExternalCall::Language)
            .worst_case()
            .saturating_add(generation)
            .saturating_add(LOCAL_ANALYSIS_ALLOWANCE);
        Self {
            text,
            document: text.saturating_add(config.policy(ExternalCall::Extraction).worst_case()),
            answer: config.policy(ExternalCall::Answer).worst_case().saturating_add(REPLY_MARGIN),
        }
    }
}

impl SupervisorHandle {
    /// Creates the production supervisor: local extraction and language detection, and
    /// an `LlmActor` when `config.llm_url` is set.
    pub fn new(config: EngineConfig) -> Self {
        let llm = LlmActorHandle::from_config(&config).map(Arc::new);
        Self::with_collaborators(config, llm, Arc::new(LocalTextExtractor), Arc::new(HeuristicLanguageDetector))
    }

    /// Creates a supervisor over explicit collaborators and spawns its runner.
    ///
    /// # Arguments
    ///
    /// * `llm` - The generative client. `None` disables generation; every generative step
    ///   then uses its local fallback.
    /// * `extractor` - Turns uploaded bytes into text.
    /// * `detector` - Detects the document language when no hint is given.
    pub fn with_collaborators<L, E, D>(
        config: EngineConfig,
        llm: Option<Arc<L>>,
        extractor: Arc<E>,
        detector: Arc<D>,
    ) -> Self
    where
        L: LlmActor,
        E: TextExtractor,
        D: LanguageDetector,
    {
        let (sender, receiver) = mpsc::channel(32);
        let deadlines = ReplyDeadlines::from_config(&config);
        let pipeline = DocumentPipeline::new(config, llm, extractor, detector);
        let actor = SupervisorRunner {
            receiver,
            pipeline: Arc::new(pipeline),
        };
        tokio::spawn(async move { actor.run().await });
        Self { sender, deadlines }
    }

    /// Extracts the text of an uploaded file and analyzes it.
    ///
    /// Fails only when extraction fails after its retries, or when the actor is gone.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn analyze_document(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        language_hint: Option<String>,
    ) -> Result<DocumentReport, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::AnalyzeDocument {
            file_name,
            bytes,
            language_hint,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.deadlines.document, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }

    /// Analyzes already extracted text.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn analyze_text(&self, text: String, language_hint: Option<String>) -> Result<DocumentReport, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::AnalyzeText {
            text,
            language_hint,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.deadlines.text, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Answers a question about `document_text`.
    ///
    /// Generation problems produce a fixed guidance message, not an error.
    #[instrument(skip(self, document_text), fields(document_len = document_text.len()))]
    pub async fn answer_question(
        &self,
        question: String,
        document_text: String,
        language: String,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::AnswerQuestion {
            question,
            document_text,
            language,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.deadlines.answer, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Stops the supervisor. Requests already accepted still complete.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))
    }
}

// --- Actor Runner ---
struct SupervisorRunner<L, E, D>
where
    L: LlmActor,
    E: TextExtractor,
    D: LanguageDetector,
{
    receiver: mpsc::Receiver<SupervisorMessage>,
    pipeline: Arc<DocumentPipeline<L, E, D>>,
}

impl<L, E, D> SupervisorRunner<L, E, D>
where
    L: LlmActor,
    E: TextExtractor,
    D: LanguageDetector,
{
    async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if self.handle_message(msg).is_break() {
                break;
            }
        }
        info!("Supervisor stopped");
    }

    /// Every request runs on its own task; documents share no state.
    fn handle_message(&self, msg: SupervisorMessage) -> ControlFlow<()> {
        let pipeline = Arc::clone(&self.pipeline);
        match msg {
            SupervisorMessage::AnalyzeDocument {
                file_name,
                bytes,
                language_hint,
                responder,
            } => {
                tokio::spawn(async move {
                    let result = pipeline.analyze_document(file_name, bytes, language_hint).await;
                    if let Err(e) = &result {
                        warn!("Document analysis failed: {}", e);
                    }
                    let _ = responder.send(result);
                });
            }
            SupervisorMessage::AnalyzeText {
                text,
                language_hint,
                responder,
            } => {
                tokio::spawn(async move {
                    let report = pipeline.analyze_text(text, language_hint, None).await;
                    let _ = responder.send(report);
                });
            }
            SupervisorMessage::AnswerQuestion {
                question,
                document_text,
                language,
                responder,
            } => {
                tokio::spawn(async move {
                    let answer = pipeline.answer_question(question, document_text, language).await;
                    let _ = responder.send(answer);
                });
            }
            SupervisorMessage::Shutdown => {
                info!("Supervisor shutting down...");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}

/// The document-processing pipeline, usable with or without the actor around it.
pub struct DocumentPipeline<L, E, D> {
    config: EngineConfig,
    llm: Option<Arc<L>>,
    extractor: Arc<E>,
    detector: Arc<D>,
    analyzer: ClauseAnalyzer,
}

impl<L, E, D> DocumentPipeline<L, E, D>
where
    L: LlmActor,
    E: TextExtractor,
    D: LanguageDetector,
{
    pub fn new(config: EngineConfig, llm: Option<Arc<L>>, extractor: Arc<E>, detector: Arc<D>) -> Self {
        Self {
            config,
            llm,
            extractor,
            detector,
            analyzer: ClauseAnalyzer::new(),
        }
    }

    /// Extracts text under the extraction budget, then runs [`Self::analyze_text`].
    pub async fn analyze_document(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        language_hint: Option<String>,
    ) -> Result<DocumentReport, AppError> {
        info!(file_name = %file_name, bytes = bytes.len(), "Analyzing document");

        let policy = self.config.policy(ExternalCall::Extraction);
        let extractor = Arc::clone(&self.extractor);
        let bytes = Arc::new(bytes);
        let name = file_name.clone();
        let text = with_retry("Text extraction", &policy, move || {
            let extractor = Arc::clone(&extractor);
            let name = name.clone();
            let bytes = bytes.to_vec();
            async move { extractor.extract(name, bytes).await }
        })
        .await?;

        Ok(self.analyze_text(text, language_hint, Some(file_name)).await)
    }

    /// Produces the full report for `text`. Every external step has a local fallback.
    pub async fn analyze_text(
        &self,
        text: String,
        language_hint: Option<String>,
        file_name: Option<String>,
    ) -> DocumentReport {
        let started = Instant::now();
        let text: Arc<str> = Arc::from(text);
        info!(text_len = text.len(), "Analyzing text");

        let language = self.resolve_language(&text, language_hint).await;
        let document_type = detect_document_type(&text);
        info!(language = %language.code, document_type = %document_type, "Document classified");

        let (clauses, key_terms) = self.analyze_locally(&text, &language.code).await;
        info!(clauses = clauses.len(), key_terms = key_terms.len(), "Local analysis complete");

        let ((summary, summary_source), (questions, question_source)) = tokio::join!(
            self.summarize(&text, &language.code, document_type, &key_terms, &clauses),
            self.suggest_questions(&text, &language.code),
        );
        let summary_sections = parse_summary_sections(&summary);

        let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            processing_time_ms,
            summary_source = ?summary_source,
            question_source = ?question_source,
            "Document report ready"
        );

        DocumentReport {
            id: DocumentReport::new_id(),
            file_name,
            document_type,
            language,
            clauses,
            key_terms,
            summary,
            summary_sections,
            summary_source,
            questions,
            question_source,
            text_length: text.chars().count(),
            processed_at: Utc::now(),
            processing_time_ms,
        }
    }

    /// Answers a question grounded in the document, or returns a fixed guidance message.
    pub async fn answer_question(&self, question: String, document_text: String, language: String) -> String {
        let Some(llm) = self.llm.clone() else {
            info!("Generation disabled, returning fixed answer");
            return ANSWER_UNAVAILABLE.to_string();
        };

        let prompt = build_answer_prompt(&question, &document_text, &language);
        let policy = self.config.policy(ExternalCall::Answer);
        let result = with_retry("Answer generation", &policy, move || {
            let llm = Arc::clone(&llm);
            let prompt = prompt.clone();
            async move { llm.generate_with_params(prompt, None, None).await }
        })
        .await;

        match result {
            Ok(raw) => finalize_answer(&raw),
            Err(e) => {
                warn!("Answer generation failed: {}", e);
                ANSWER_FAILED.to_string()
            }
        }
    }

    async fn resolve_language(&self, text: &Arc<str>, hint: Option<String>) -> DetectedLanguage {
        if let Some(code) = hint.map(|h| h.trim().to_lowercase()).filter(|h| !h.is_empty()) {
            if is_supported(&code) {
                return DetectedLanguage::new(&code, 1.0);
            }
            warn!(language = %code, "Unsupported language hint, detecting instead");
        }

        let policy = self.config.policy(ExternalCall::Language);
        let detector = Arc::clone(&self.detector);
        let sample = Arc::clone(text);
        let result = with_retry("Language detection", &policy, move || {
            let detector = Arc::clone(&detector);
            let sample = Arc::clone(&sample);
            async move { detector.detect(&sample).await }
        })
        .await;

        result.unwrap_or_else(|e| {
            warn!("Language detection failed, defaulting to English: {}", e);
            DetectedLanguage::new("en", 0.5)
        })
    }

    /// Clause analysis and the four term passes, each on its own blocking thread.
    async fn analyze_locally(&self, text: &Arc<str>, language: &str) -> (Vec<Clause>, KeyTerms) {
        let analyzer = self.analyzer;
        let clause_text = Arc::clone(text);
        let financial_text = Arc::clone(text);
        let (date_text, date_lang) = (Arc::clone(text), language.to_string());
        let (notice_text, notice_lang) = (Arc::clone(text), language.to_string());
        let (penalty_text, penalty_lang) = (Arc::clone(text), language.to_string());

        let (clauses, financial, dates, notices, penalties) = tokio::join!(
            run_blocking("clauses", move || analyzer.classify_document(&clause_text)),
            run_blocking("financial", move || extract_financial_terms(&financial_text)),
            run_blocking("dates", move || extract_date_terms(&date_text, &date_lang)),
            run_blocking("notices", move || extract_notice_periods(&notice_text, &notice_lang)),
            run_blocking("penalties", move || extract_penalties(&penalty_text, &penalty_lang)),
        );

        let key_terms = KeyTerms {
            financial: financial.unwrap_or_default(),
            dates: dates.unwrap_or_default(),
            notices: notices.unwrap_or_default(),
            penalties: penalties.unwrap_or_default(),
        };
        (clauses.unwrap_or_else(|| document_fallback(text)), key_terms)
    }

    async fn summarize(
        &self,
        text: &str,
        language: &str,
        document_type: DocumentType,
        key_terms: &KeyTerms,
        clauses: &[Clause],
    ) -> (String, SummarySource) {
        if let Some(llm) = self.llm.clone() {
            let prompt = build_summary_prompt(text, language);
            let policy = self.config.policy(ExternalCall::Summary);
            let result = with_retry("Summary generation", &policy, move || {
                let llm = Arc::clone(&llm);
                let prompt = prompt.clone();
                async move {
                    let raw = llm.generate_with_params(prompt, None, None).await?;
                    validate_summary(&raw)
                }
            })
            .await;

            match result {
                Ok(summary) => return (summary, SummarySource::Generated),
                Err(e) => warn!("Summary generation failed, using local summary: {}", e),
            }
        }
        (fallback_summary(document_type, key_terms, clauses), SummarySource::Fallback)
    }

    async fn suggest_questions(&self, text: &str, language: &str) -> (Vec<String>, QuestionSource) {
        if let Some(llm) = self.llm.clone() {
            let prompt = build_questions_prompt(text, language);
            let policy = self.config.policy(ExternalCall::Questions);
            let result = with_retry("Question generation", &policy, move || {
                let llm = Arc::clone(&llm);
                let prompt = prompt.clone();
                async move {
                    let raw = llm.generate_with_params(prompt, None, None).await?;
                    parse_generated_questions(&raw)
                }
            })
            .await;

            match result {
                Ok(questions) => return (questions, QuestionSource::Generated),
                Err(e) => warn!("Question generation failed, using fixed questions: {}", e),
            }
        }
        (fallback_questions(), QuestionSource::Fallback)
    }
}

/// Runs one local pass off the async runtime. A panic is logged and yields `None`.
async fn run_blocking<T, F>(pass: &'static str, work: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(pass, "Local analysis pass failed: {}", e);
            None
        }
    }
}

//! Test Module
//!
//! Cross-module test suite for the ClauseLens engine.
//!
//! ## Test Categories
//! - `engine_tests`: segmentation bounds, classification, risk scoring, panic containment
//! - `terms_tests`: financial, date, notice and penalty extraction on realistic text
//! - `generative_tests`: summary and question contracts, fallbacks, JSON repair
//! - `resilience_tests`: timeouts, retries and backoff of the invocation wrapper
//! - `text_extract_tests`: file-based extraction through the async collaborator
//! - `actor_tests`: LLM client and supervisor pipeline with mock collaborators

pub mod actor_tests;
pub mod generative_tests;
pub mod text_extract_tests;

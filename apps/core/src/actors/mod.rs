//! # Actors
//!
//! Message-passing wrappers around the parts of the engine that talk to the outside world.
//!
//! ## Components
//! - `supervisor`: document-processing pipeline and the engine's single entry point
//! - `llm`: client for a llama.cpp-compatible completion server
//! - `traits`: collaborator interfaces, so tests can swap in mocks
//! - `messages`: mailbox message types

pub mod llm;
pub mod messages;
pub mod supervisor;
pub mod traits;

pub use llm::LlmActorHandle;
pub use supervisor::{DocumentPipeline, SupervisorHandle};
pub use traits::LlmActor;

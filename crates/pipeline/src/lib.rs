//! Entry analysis pipeline.
//!
//! Turns a validated [`Entry`](journal_core::entry::Entry) into an
//! [`AnalysisResult`](journal_core::analysis::AnalysisResult) by composing
//! the provider input, calling an [`Analyzer`](journal_analyzer::Analyzer),
//! and normalizing whatever comes back.

pub mod error;
pub mod orchestrator;
pub mod payload;
pub mod prompt;

pub use error::AnalysisError;
pub use orchestrator::AnalysisOrchestrator;

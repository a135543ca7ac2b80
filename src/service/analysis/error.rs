//! Error types for RCA analysis

use thiserror::Error;

/// Error type for RCA analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Document text is empty")]
    EmptyDocument,

    #[error("LLM analysis failed: {0}")]
    GenerationFailed(String),

    #[error("LLM analysis output rejected: {0}")]
    InvalidOutput(String),
}

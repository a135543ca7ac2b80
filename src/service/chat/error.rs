//! Error types for chat and comment replies

use thiserror::Error;

use crate::db::DbError;

/// Error type for chat and comment replies
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Reply is empty")]
    EmptyReply,

    #[error("LLM chat failed: {0}")]
    GenerationFailed(String),

    #[error("Failed to store chat messages: {0}")]
    Store(#[from] DbError),
}

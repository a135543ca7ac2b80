//! Database module for PostgreSQL persistence of analyses and chat transcripts

pub mod models;
pub mod repository;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

use crate::model::{AnalysisResult, ChatMessage};

// Environment variable names
const ENV_POSTGRES_HOST: &str = "RCA_REVIEW_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "RCA_REVIEW_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "RCA_REVIEW_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "RCA_REVIEW_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "RCA_REVIEW_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "rca_reviewer";
const DEFAULT_POSTGRES_PASSWORD: &str = "rca_reviewer";
const DEFAULT_POSTGRES_DB: &str = "rca_reviewer";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Database is not available")]
    Unavailable,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Document store for analysis results and chat messages
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Store one analysis result
    async fn insert_analysis(&self, analysis: &AnalysisResult) -> Result<(), DbError>;

    /// Most recent analyses, newest first
    async fn recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisResult>, DbError>;

    /// Store messages in the given order
    async fn insert_chat_messages(&self, messages: &[ChatMessage]) -> Result<(), DbError>;

    /// Messages of a session, oldest first
    ///
    /// With a limit, only the most recent `limit` messages are returned (still oldest first).
    async fn chat_history(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, DbError>;

    /// Check that the store answers
    async fn ping(&self) -> Result<(), DbError>;
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

const CREATE_ANALYSES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS rca_analyses (
        analysis_id VARCHAR(64) PRIMARY KEY,
        total_score INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        document JSONB NOT NULL
    )
"#;

/// Session ids are caller-chosen strings of any length
const CREATE_CHAT_MESSAGES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS rca_chat_messages (
        id BIGSERIAL PRIMARY KEY,
        session_id TEXT NOT NULL,
        role VARCHAR(16) NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
"#;

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(CREATE_ANALYSES_TABLE).execute(pool).await?;
    sqlx::query(CREATE_CHAT_MESSAGES_TABLE).execute(pool).await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_rca_analyses_created_at ON rca_analyses(created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_rca_chat_messages_session ON rca_chat_messages(session_id, created_at, id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_column_is_unbounded() {
        let column = CREATE_CHAT_MESSAGES_TABLE
            .lines()
            .find(|line| line.trim_start().starts_with("session_id"))
            .unwrap();

        assert!(column.contains("TEXT"));
        assert!(!column.contains("VARCHAR"));
    }
}

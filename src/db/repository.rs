//! Repository for analysis and chat message database operations

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::{AnalysisRow, ChatMessageRow};
use super::{DbError, ReviewStore};
use crate::model::{AnalysisResult, ChatMessage};

/// PostgreSQL-backed review store
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for ReviewRepository {
    async fn insert_analysis(&self, analysis: &AnalysisResult) -> Result<(), DbError> {
        let row = AnalysisRow::from_domain(analysis).map_err(DbError::Serialization)?;

        sqlx::query(
            r#"
            INSERT INTO rca_analyses (analysis_id, total_score, created_at, document)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&row.analysis_id)
        .bind(row.total_score)
        .bind(row.created_at)
        .bind(&row.document)
        .execute(&self.pool)
        .await?;

        tracing::debug!(analysis_id = %row.analysis_id, "Stored analysis");
        Ok(())
    }

    async fn recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisResult>, DbError> {
        let rows: Vec<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT analysis_id, total_score, created_at, document
            FROM rca_analyses
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    async fn insert_chat_messages(&self, messages: &[ChatMessage]) -> Result<(), DbError> {
        if messages.is_empty() {
            return Ok(());
        }

        // A single multi-row insert keeps the sequence ids in the given order
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO rca_chat_messages (session_id, role, content, created_at) ",
        );
        builder.push_values(messages, |mut row, message| {
            row.push_bind(message.session_id.clone())
                .push_bind(message.role.as_str())
                .push_bind(message.content.clone())
                .push_bind(message.created_at);
        });

        builder.build().execute(&self.pool).await?;

        tracing::debug!(
            session_id = %messages[0].session_id,
            count = messages.len(),
            "Stored chat messages"
        );
        Ok(())
    }

    async fn chat_history(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, DbError> {
        let rows: Vec<ChatMessageRow> = match limit {
            Some(limit) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM (
                        SELECT id, session_id, role, content, created_at
                        FROM rca_chat_messages
                        WHERE session_id = $1
                        ORDER BY created_at DESC, id DESC
                        LIMIT $2
                    ) recent
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .bind(session_id)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT id, session_id, role, content, created_at
                    FROM rca_chat_messages
                    WHERE session_id = $1
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .bind(session_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

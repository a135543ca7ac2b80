//! Read access to stored analyses and chat transcripts

use std::sync::Arc;

use crate::db::{DbError, ReviewStore};
use crate::model::config::MAX_RECENT_ANALYSES;
use crate::model::{AnalysisResult, ChatMessage, HistoryConfig};

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

/// Service for listing past analyses and chat sessions
///
/// Reads go straight to the store; an unavailable store is an error.
pub struct HistoryService {
    store: Option<Arc<dyn ReviewStore>>,
    recent_limit: usize,
}

impl HistoryService {
    pub fn new(store: Option<Arc<dyn ReviewStore>>, config: &HistoryConfig) -> Self {
        Self {
            store,
            recent_limit: config.recent_analyses_limit.clamp(1, MAX_RECENT_ANALYSES),
        }
    }

    /// Most recent analyses, newest first
    pub async fn recent_analyses(&self) -> Result<Vec<AnalysisResult>, HistoryError> {
        let analyses = self.store()?.recent_analyses(self.recent_limit).await?;
        tracing::debug!(count = analyses.len(), "Listed recent analyses");
        Ok(analyses)
    }

    /// Full transcript of a session, oldest first
    pub async fn chat_history(&self, session_id: &str) -> Result<Vec<ChatMessage>, HistoryError> {
        let messages = self.store()?.chat_history(session_id, None).await?;
        tracing::debug!(session_id = %session_id, count = messages.len(), "Loaded chat history");
        Ok(messages)
    }

    fn store(&self) -> Result<&Arc<dyn ReviewStore>, DbError> {
        self.store.as_ref().ok_or(DbError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChatRole, DimensionScores, ExecutiveSummary};
    use crate::service::testing::MemoryStore;
    use chrono::{Duration, Utc};

    fn analysis(id: usize, minutes_ago: i64) -> AnalysisResult {
        AnalysisResult {
            analysis_id: format!("a-{}", id),
            score: DimensionScores::default(),
            total_score: 0,
            comments: vec![],
            executive_summary: ExecutiveSummary::default(),
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_recent_analyses_are_capped_and_sorted() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..15 {
            // Insert out of chronological order
            let minutes_ago = ((i * 7) % 15) as i64;
            store.insert_analysis(&analysis(i, minutes_ago)).await.unwrap();
        }

        let service =
            HistoryService::new(Some(store as Arc<dyn ReviewStore>), &HistoryConfig::default());
        let analyses = service.recent_analyses().await.unwrap();

        assert_eq!(analyses.len(), 10);
        assert!(analyses.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn test_recent_limit_never_exceeds_ten() {
        let config = HistoryConfig {
            chat_context_limit: 20,
            recent_analyses_limit: 100,
        };
        let service = HistoryService::new(None, &config);
        assert_eq!(service.recent_limit, 10);
    }

    #[tokio::test]
    async fn test_chat_history_is_unbounded_and_ordered() {
        let store = Arc::new(MemoryStore::new());
        let start = Utc::now();
        for i in 0..15 {
            let at = start + Duration::seconds(i);
            store
                .insert_chat_messages(&[
                    ChatMessage::new("s1", ChatRole::User, &format!("q{}", i), at),
                    ChatMessage::new("s1", ChatRole::Assistant, &format!("a{}", i), at),
                ])
                .await
                .unwrap();
        }
        store
            .insert_chat_messages(&[ChatMessage::new("other", ChatRole::User, "x", start)])
            .await
            .unwrap();

        let service =
            HistoryService::new(Some(store as Arc<dyn ReviewStore>), &HistoryConfig::default());
        let history = service.chat_history("s1").await.unwrap();

        assert_eq!(history.len(), 30);
        assert_eq!(history[0].content, "q0");
        assert_eq!(history[1].content, "a0");
        assert_eq!(history[29].content, "a14");
    }

    #[tokio::test]
    async fn test_unavailable_store_is_an_error() {
        let service = HistoryService::new(None, &HistoryConfig::default());

        assert!(service.recent_analyses().await.is_err());
        assert!(matches!(
            service.chat_history("s1").await,
            Err(HistoryError::DbError(DbError::Unavailable))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let service =
            HistoryService::new(Some(store as Arc<dyn ReviewStore>), &HistoryConfig::default());

        assert!(service.recent_analyses().await.is_err());
    }
}

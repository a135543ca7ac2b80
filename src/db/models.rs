//! Database rows for analyses and chat messages

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::model::{AnalysisResult, ChatMessage, ChatRole};

/// Database representation of an analysis result
#[derive(Debug, Clone, FromRow)]
pub struct AnalysisRow {
    pub analysis_id: String,
    pub total_score: i32,
    pub created_at: DateTime<Utc>,
    pub document: serde_json::Value,
}

impl AnalysisRow {
    pub fn from_domain(analysis: &AnalysisResult) -> Result<Self, String> {
        let document = serde_json::to_value(analysis)
            .map_err(|e| format!("Failed to serialize analysis: {}", e))?;

        Ok(Self {
            analysis_id: analysis.analysis_id.clone(),
            total_score: i32::try_from(analysis.total_score)
                .map_err(|_| format!("Total score out of range: {}", analysis.total_score))?,
            created_at: analysis.timestamp,
            document,
        })
    }

    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<AnalysisResult, String> {
        serde_json::from_value(self.document)
            .map_err(|e| format!("Invalid analysis document {}: {}", self.analysis_id, e))
    }
}

/// Database representation of a chat message
#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageRow {
    pub id: i64,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessageRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<ChatMessage, String> {
        let role = ChatRole::parse(&self.role)
            .ok_or_else(|| format!("Invalid role '{}' on chat message {}", self.role, self.id))?;

        Ok(ChatMessage {
            session_id: self.session_id,
            role,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

//! Chat service for RCA follow-up discussion
//!
//! Session chat keeps a transcript in the review store; comment replies are
//! stateless single exchanges.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::{DbError, ReviewStore};
use crate::model::{ChatMessage, ChatRole, HistoryConfig, LlmConfig};
use crate::service::chat::prompts::{
    CHAT_SYSTEM_PROMPT, build_comment_reply_prompt, document_context_instruction,
};
use crate::service::llm::{CompletionRequest, PromptMessage, TextGenerator};

pub mod error;
pub mod prompts;

pub use error::ChatError;

/// Assistant reply and the session it belongs to
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    pub session_id: String,
}

/// User reply to an inline review comment
#[derive(Debug, Clone)]
pub struct CommentReply {
    pub thread_context: String,
    pub user_reply: String,
    pub issue_type: String,
    pub original_comment: String,
}

/// Service for session chat and comment replies
pub struct ChatService {
    llm: Arc<dyn TextGenerator>,
    store: Option<Arc<dyn ReviewStore>>,
    model: String,
    temperature: f64,
    context_limit: usize,
}

impl ChatService {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        store: Option<Arc<dyn ReviewStore>>,
        llm_config: &LlmConfig,
        history_config: &HistoryConfig,
    ) -> Self {
        tracing::info!(
            model = %llm_config.chat_model,
            temperature = llm_config.chat_temperature,
            context_limit = history_config.chat_context_limit,
            "Chat service initialized"
        );

        Self {
            llm,
            store,
            model: llm_config.chat_model.clone(),
            temperature: llm_config.chat_temperature,
            context_limit: history_config.chat_context_limit,
        }
    }

    /// Answer a chat message within a session
    ///
    /// A supplied session id is used verbatim; a fresh one is generated when it
    /// is absent or empty. The user message and
    /// the reply are stored with the same timestamp; failing to store them fails
    /// the call.
    pub async fn chat(
        &self,
        message: &str,
        document_context: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let session_id = session_id
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let history = self.load_context(&session_id).await;

        let mut messages = vec![PromptMessage::system(CHAT_SYSTEM_PROMPT)];
        if let Some(context) = document_context.filter(|c| !c.trim().is_empty()) {
            messages.push(PromptMessage::system(document_context_instruction(context)));
        }
        messages.extend(history.into_iter().map(|m| match m.role {
            ChatRole::User => PromptMessage::user(m.content),
            ChatRole::Assistant => PromptMessage::assistant(m.content),
        }));
        messages.push(PromptMessage::user(message));

        let reply = self.generate(messages, &session_id).await?;

        let now = Utc::now();
        let transcript = [
            ChatMessage::new(&session_id, ChatRole::User, message, now),
            ChatMessage::new(&session_id, ChatRole::Assistant, &reply, now),
        ];

        let store = self.store.as_ref().ok_or(DbError::Unavailable)?;
        store.insert_chat_messages(&transcript).await?;

        Ok(ChatReply { reply, session_id })
    }

    /// Respond to a user's reply on an inline comment
    pub async fn reply_to_comment(&self, request: &CommentReply) -> Result<String, ChatError> {
        if request.user_reply.trim().is_empty() {
            return Err(ChatError::EmptyReply);
        }

        let prompt = build_comment_reply_prompt(
            &request.original_comment,
            &request.issue_type,
            &request.thread_context,
            &request.user_reply,
        );

        let messages = vec![
            PromptMessage::system(CHAT_SYSTEM_PROMPT),
            PromptMessage::user(prompt),
        ];

        self.generate(messages, "comment-reply").await
    }

    /// Most recent messages of the session; read failures yield an empty history
    async fn load_context(&self, session_id: &str) -> Vec<ChatMessage> {
        let Some(store) = &self.store else {
            tracing::warn!(session_id = %session_id, "No review store configured, chat history unavailable");
            return Vec::new();
        };

        match store
            .chat_history(session_id, Some(self.context_limit))
            .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to load chat history (non-critical)"
                );
                Vec::new()
            }
        }
    }

    async fn generate(
        &self,
        messages: Vec<PromptMessage>,
        label: &str,
    ) -> Result<String, ChatError> {
        let start_time = std::time::Instant::now();
        let message_count = messages.len();

        let request = CompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages,
        };

        match self.llm.complete(request).await {
            Ok(reply) => {
                tracing::info!(
                    exchange = %label,
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    message_count = message_count,
                    "LLM chat call completed successfully"
                );
                Ok(reply)
            }
            Err(e) => {
                tracing::error!(
                    exchange = %label,
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    message_count = message_count,
                    error = %e,
                    "LLM chat call failed"
                );
                Err(ChatError::GenerationFailed(e.to_string()))
            }
        }
    }
}

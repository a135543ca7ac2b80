//! Shared LLM client and interaction utilities
//!
//! Provides the [`TextGenerator`] seam used by all services and its OpenAI
//! implementation built on rig.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::{Chat, Message};
use rig::extractor::ExtractionError;
use rig::providers::openai;

use crate::model::extracted::ExtractedReview;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Invalid LLM request: {0}")]
    InvalidRequest(String),

    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    #[error("LLM returned unusable structured output: {0}")]
    Extraction(String),
}

/// Role of a message sent to the LLM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// Role-tagged message sent to the LLM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
        }
    }
}

/// Free-text completion over a conversation
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f64,
    /// System messages, then the conversation; must end with a user message
    pub messages: Vec<PromptMessage>,
}

/// Structured review extraction
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub model: String,
    pub temperature: f64,
    pub preamble: String,
    pub prompt: String,
}

/// Text-generation collaborator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a free-text reply to a conversation
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;

    /// Generate a review in the structured [`ExtractedReview`] shape
    async fn extract_review(&self, request: ReviewRequest) -> Result<ExtractedReview, LlmError>;
}

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = openai::Client::new(api_key);

        Ok(Self { client })
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let (system, prompt, history) = split_conversation(request.messages)?;

        let mut builder = self
            .client
            .agent(&request.model)
            .temperature(request.temperature);

        let mut system = system.into_iter();
        if let Some(preamble) = system.next() {
            builder = builder.preamble(&preamble);
        }
        for extra in system {
            builder = builder.append_preamble(&extra);
        }

        let agent = builder.build();

        agent
            .chat(prompt, history)
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))
    }

    async fn extract_review(&self, request: ReviewRequest) -> Result<ExtractedReview, LlmError> {
        let extractor = self
            .client
            .extractor::<ExtractedReview>(&request.model)
            .preamble(&request.preamble)
            .additional_params(serde_json::json!({
                "temperature": request.temperature
            }))
            .build();

        extractor
            .extract(request.prompt.as_str())
            .await
            .map_err(extraction_error)
    }
}

/// Transport and provider failures are request failures; only unusable output is an extraction error
fn extraction_error(error: ExtractionError) -> LlmError {
    match error {
        ExtractionError::CompletionError(e) => LlmError::RequestFailed(e.to_string()),
        other => LlmError::Extraction(other.to_string()),
    }
}

/// Split a conversation into system instructions, the final user prompt and prior turns
fn split_conversation(
    messages: Vec<PromptMessage>,
) -> Result<(Vec<String>, String, Vec<Message>), LlmError> {
    let (system, mut conversation): (Vec<_>, Vec<_>) = messages
        .into_iter()
        .partition(|m| m.role == PromptRole::System);

    let prompt = match conversation.pop() {
        Some(last) if last.role == PromptRole::User => last.content,
        _ => {
            return Err(LlmError::InvalidRequest(
                "conversation must end with a user message".to_string(),
            ));
        }
    };

    let history = conversation
        .into_iter()
        .map(|m| match m.role {
            PromptRole::User => Message::user(m.content),
            _ => Message::assistant(m.content),
        })
        .collect();

    let system = system.into_iter().map(|m| m.content).collect();

    Ok((system, prompt, history))
}

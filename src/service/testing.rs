//! In-memory collaborators for tests

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::app::AppState;
use crate::db::{DbError, ReviewStore};
use crate::model::extracted::ExtractedReview;
use crate::model::{AnalysisResult, ChatMessage, Config};
use crate::service::llm::{CompletionRequest, LlmError, ReviewRequest, TextGenerator};

/// Review with all six dimensions, two valid comments and one with an unknown issue type
pub fn sample_review_json() -> String {
    r#"{
        "scores": {
            "incident_clarity": {"score": 3, "rationale": "Impact stated, no customer numbers"},
            "timeline_completeness": {"score": 1, "rationale": "No timeline"},
            "root_cause_depth": {"score": 1, "rationale": "Root cause unknown"},
            "detection_alerting": {"score": 0, "rationale": "Detection not described"},
            "corrective_actions": {"score": 0, "rationale": "No action items"},
            "learnings_quality": {"score": 2, "rationale": "Implicit only"}
        },
        "comments": [
            {
                "issue_id": "rc-1",
                "issue_type": "Weak root cause",
                "anchor_text": "Root cause: unknown.",
                "comment_body": "[Weak root cause]\nThe root cause is not identified.\nRecommendation: Apply 5 Whys.",
                "resolved": false
            },
            {
                "issue_type": "Missing section",
                "anchor_text": "Incident: outage.",
                "comment_body": "[Missing section]\nNo timeline section.\nRecommendation: Add a timeline."
            },
            {
                "issue_id": "bogus",
                "issue_type": "Tone",
                "anchor_text": "outage",
                "comment_body": "Too short."
            }
        ],
        "executive_summary": {
            "overall_interpretation": "The RCA does not yet explain the outage.",
            "leadership_bullets": ["Outage occurred", "Cause unknown", "No timeline", "No actions", "Risk open"],
            "key_gaps": ["Root cause", "Timeline", "Actions"],
            "recurrence_risk": "High",
            "recurrence_rationale": "Nothing prevents a repeat.",
            "action_critique": "There are no action items to evaluate.",
            "improvements": ["Find the cause", "Add timeline", "Add preventive actions"]
        }
    }"#
    .to_string()
}

/// Scripted text generator that records every request
pub struct FakeGenerator {
    reply: Result<String, String>,
    review: Result<ExtractedReview, String>,
    completions: Mutex<Vec<CompletionRequest>>,
    reviews: Mutex<Vec<ReviewRequest>>,
}

impl FakeGenerator {
    /// Replies with a fixed text and returns the sample review
    pub fn new() -> Self {
        Self::reviewing(&sample_review_json())
    }

    /// Returns the given JSON as the structured review
    pub fn reviewing(json: &str) -> Self {
        let review = serde_json::from_str(json).map_err(|e| e.to_string());
        Self {
            reply: Ok("Acknowledged. The root cause section still needs work.".to_string()),
            review,
            completions: Mutex::new(Vec::new()),
            reviews: Mutex::new(Vec::new()),
        }
    }

    /// Replies with the given text
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            ..Self::new()
        }
    }

    /// Fails every request with the given reason
    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            review: Err(reason.to_string()),
            completions: Mutex::new(Vec::new()),
            reviews: Mutex::new(Vec::new()),
        }
    }

    pub fn completion_calls(&self) -> Vec<CompletionRequest> {
        self.completions.lock().unwrap().clone()
    }

    pub fn review_calls(&self) -> Vec<ReviewRequest> {
        self.reviews.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.completions.lock().unwrap().push(request);
        self.reply.clone().map_err(LlmError::RequestFailed)
    }

    async fn extract_review(&self, request: ReviewRequest) -> Result<ExtractedReview, LlmError> {
        self.reviews.lock().unwrap().push(request);
        self.review.clone().map_err(LlmError::RequestFailed)
    }
}

/// Review store kept in memory; can be switched to fail every call
pub struct MemoryStore {
    analyses: Mutex<Vec<AnalysisResult>>,
    messages: Mutex<Vec<ChatMessage>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            analyses: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn analyses(&self) -> Vec<AnalysisResult> {
        self.analyses.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), DbError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DbError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert_analysis(&self, analysis: &AnalysisResult) -> Result<(), DbError> {
        self.check()?;
        self.analyses.lock().unwrap().push(analysis.clone());
        Ok(())
    }

    async fn recent_analyses(&self, limit: usize) -> Result<Vec<AnalysisResult>, DbError> {
        self.check()?;
        let mut analyses = self.analyses();
        analyses.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        analyses.truncate(limit);
        Ok(analyses)
    }

    async fn insert_chat_messages(&self, messages: &[ChatMessage]) -> Result<(), DbError> {
        self.check()?;
        self.messages.lock().unwrap().extend_from_slice(messages);
        Ok(())
    }

    async fn chat_history(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, DbError> {
        self.check()?;
        // Stable sort keeps insertion order for equal timestamps
        let mut history: Vec<ChatMessage> = self
            .messages()
            .into_iter()
            .filter(|m| m.session_id == session_id)
            .collect();
        history.sort_by_key(|m| m.created_at);

        if let Some(limit) = limit {
            let skip = history.len().saturating_sub(limit);
            history.drain(..skip);
        }

        Ok(history)
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.check()
    }
}

/// Application state wired to the given fakes with default configuration
pub fn app_state(llm: Arc<FakeGenerator>, store: Option<Arc<MemoryStore>>) -> AppState {
    AppState::with_collaborators(
        &Config::default(),
        llm,
        store.map(|s| s as Arc<dyn ReviewStore>),
    )
}

//! RCA analysis service using LLM
//!
//! Scores an RCA document on six dimensions, collects inline comments and an
//! executive summary, and records the result in the review store.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::ReviewStore;
use crate::model::{AnalysisResult, LlmConfig};
use crate::service::analysis::converters::{convert_comments, convert_scores, convert_summary};
use crate::service::analysis::prompts::{analysis_system_prompt, build_analysis_prompt};
use crate::service::analysis::validation::validate_extracted_review;
use crate::service::llm::{LlmError, ReviewRequest, TextGenerator};

pub mod converters;
pub mod error;
pub mod prompts;
pub mod validation;

pub use error::AnalysisError;

/// Service for reviewing RCA documents
pub struct AnalysisService {
    llm: Arc<dyn TextGenerator>,
    store: Option<Arc<dyn ReviewStore>>,
    model: String,
    temperature: f64,
    system_prompt: String,
}

impl AnalysisService {
    /// Creates a new analysis service
    ///
    /// Uses the shared LLM client and store handle built at startup.
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        store: Option<Arc<dyn ReviewStore>>,
        config: &LlmConfig,
    ) -> Self {
        tracing::info!(
            model = %config.analysis_model,
            temperature = config.analysis_temperature,
            persistence = store.is_some(),
            "RCA analysis service initialized"
        );

        Self {
            llm,
            store,
            model: config.analysis_model.clone(),
            temperature: config.analysis_temperature,
            system_prompt: analysis_system_prompt(),
        }
    }

    /// Analyze an RCA document
    ///
    /// `existing_issue_ids` are the ids of comments from a previous analysis, passed
    /// to the reviewer so it can mark them resolved instead of raising them again.
    pub async fn analyze(
        &self,
        document_text: &str,
        existing_issue_ids: &[String],
    ) -> Result<AnalysisResult, AnalysisError> {
        if document_text.trim().is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        let start_time = std::time::Instant::now();

        let prompt = build_analysis_prompt(document_text, existing_issue_ids);
        let prompt_length = prompt.len();

        tracing::debug!(
            model = %self.model,
            prompt_length = prompt_length,
            existing_issues = existing_issue_ids.len(),
            "Initiating LLM call for RCA analysis"
        );

        let request = ReviewRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            preamble: self.system_prompt.clone(),
            prompt,
        };

        let extracted = match self.llm.extract_review(request).await {
            Ok(result) => {
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    comments = result.comments.len(),
                    "LLM call for RCA analysis completed successfully"
                );
                result
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt_length,
                    error = %e,
                    "LLM call for RCA analysis failed"
                );
                return Err(match e {
                    LlmError::Extraction(msg) => AnalysisError::InvalidOutput(msg),
                    other => AnalysisError::GenerationFailed(other.to_string()),
                });
            }
        };

        let validation_result = validate_extracted_review(&extracted, document_text);

        if !validation_result.is_valid {
            tracing::error!(
                errors = ?validation_result.errors,
                "RCA analysis validation failed"
            );
            return Err(AnalysisError::InvalidOutput(format!(
                "Validation failed: {}",
                validation_result.errors.join("; ")
            )));
        }

        if !validation_result.warnings.is_empty() {
            tracing::warn!(
                warnings = ?validation_result.warnings,
                "RCA analysis produced quality warnings"
            );
        }

        let score = convert_scores(extracted.scores);
        let total_score = score.total();

        let unscored = score.missing();
        if !unscored.is_empty() {
            tracing::info!(
                unscored = ?unscored,
                total_score = total_score,
                "RCA analysis is missing dimension scores; they count as 0"
            );
        }

        let analysis = AnalysisResult {
            analysis_id: Uuid::new_v4().to_string(),
            score,
            total_score,
            comments: convert_comments(extracted.comments),
            executive_summary: convert_summary(extracted.executive_summary),
            timestamp: Utc::now(),
        };

        self.persist(&analysis).await;

        Ok(analysis)
    }

    /// Store the analysis; failures are logged and never surfaced
    async fn persist(&self, analysis: &AnalysisResult) {
        let Some(store) = &self.store else {
            tracing::debug!(
                analysis_id = %analysis.analysis_id,
                "No review store configured, analysis not persisted"
            );
            return;
        };

        if let Err(e) = store.insert_analysis(analysis).await {
            tracing::warn!(
                analysis_id = %analysis.analysis_id,
                error = %e,
                "Failed to persist analysis (non-critical)"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dimension, IssueType};
    use crate::service::testing::{FakeGenerator, MemoryStore, sample_review_json};

    fn service(llm: Arc<FakeGenerator>, store: Option<Arc<MemoryStore>>) -> AnalysisService {
        AnalysisService::new(
            llm,
            store.map(|s| s as Arc<dyn ReviewStore>),
            &LlmConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_blank_document_is_rejected_without_llm_call() {
        let llm = Arc::new(FakeGenerator::new());
        let service = service(llm.clone(), None);

        for document in ["", "   ", "\n\t "] {
            let result = service.analyze(document, &[]).await;
            assert!(matches!(result, Err(AnalysisError::EmptyDocument)));
        }

        assert!(llm.review_calls().is_empty());
    }

    #[tokio::test]
    async fn test_analysis_sums_scores_and_persists() {
        let llm = Arc::new(FakeGenerator::new());
        let store = Arc::new(MemoryStore::new());
        let service = service(llm.clone(), Some(store.clone()));

        let document = "Incident: outage. Root cause: unknown.";
        let analysis = service.analyze(document, &[]).await.unwrap();

        assert_eq!(analysis.total_score, analysis.score.total());
        assert!(analysis.total_score <= 30);
        assert!(analysis.score.missing().is_empty());
        assert!(!analysis.analysis_id.is_empty());

        let stored = store.analyses();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].analysis_id, analysis.analysis_id);

        let calls = llm.review_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, 0.3);
        assert!(calls[0].prompt.contains(document));
        assert!(calls[0].preamble.contains("Vague ownership"));
    }

    #[tokio::test]
    async fn test_missing_dimension_contributes_zero() {
        let json = r#"{
            "scores": {
                "incident_clarity": {"score": 2, "rationale": "thin"},
                "root_cause_depth": {"score": 1, "rationale": "proximate only"}
            },
            "comments": [],
            "executive_summary": {}
        }"#;
        let llm = Arc::new(FakeGenerator::reviewing(json));
        let service = service(llm, None);

        let analysis = service.analyze("Some RCA", &[]).await.unwrap();

        assert_eq!(analysis.total_score, 3);
        assert!(analysis.score.get(Dimension::TimelineCompleteness).is_none());
        assert_eq!(analysis.score.missing().len(), 4);
        assert!(analysis.comments.is_empty());
    }

    #[tokio::test]
    async fn test_each_analysis_gets_a_fresh_id() {
        let service = service(Arc::new(FakeGenerator::new()), None);

        let first = service.analyze("Same RCA", &[]).await.unwrap();
        let second = service.analyze("Same RCA", &[]).await.unwrap();

        assert_ne!(first.analysis_id, second.analysis_id);
    }

    #[tokio::test]
    async fn test_existing_issue_ids_are_forwarded() {
        let llm = Arc::new(FakeGenerator::new());
        let service = service(llm.clone(), None);

        let ids = vec!["issue-7".to_string()];
        service.analyze("RCA body", &ids).await.unwrap();

        assert!(llm.review_calls()[0].prompt.contains(r#"["issue-7"]"#));
    }

    #[tokio::test]
    async fn test_unknown_issue_types_are_dropped() {
        let llm = Arc::new(FakeGenerator::new());
        let service = service(llm, None);

        let analysis = service
            .analyze("Incident: outage. Root cause: unknown.", &[])
            .await
            .unwrap();

        assert!(!analysis.comments.is_empty());
        assert!(
            analysis
                .comments
                .iter()
                .all(|c| IssueType::ALL.contains(&c.issue_type))
        );
        let raw: serde_json::Value = serde_json::from_str(&sample_review_json()).unwrap();
        let raw_count = raw["comments"].as_array().unwrap().len();
        assert_eq!(analysis.comments.len(), raw_count - 1);
    }

    #[tokio::test]
    async fn test_store_failure_does_not_fail_analysis() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let service = service(Arc::new(FakeGenerator::new()), Some(store.clone()));

        let analysis = service.analyze("RCA body", &[]).await;

        assert!(analysis.is_ok());
        assert!(store.analyses().is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_is_reported() {
        let service = service(Arc::new(FakeGenerator::failing("quota exceeded")), None);

        let result = service.analyze("RCA body", &[]).await;

        match result {
            Err(AnalysisError::GenerationFailed(msg)) => assert!(msg.contains("quota exceeded")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_rejected() {
        let json = r#"{"scores": {"incident_clarity": {"score": 11, "rationale": "?"}}}"#;
        let store = Arc::new(MemoryStore::new());
        let service = service(Arc::new(FakeGenerator::reviewing(json)), Some(store.clone()));

        let result = service.analyze("RCA body", &[]).await;

        assert!(matches!(result, Err(AnalysisError::InvalidOutput(_))));
        assert!(store.analyses().is_empty());
    }
}

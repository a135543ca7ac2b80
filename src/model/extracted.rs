//! LLM-extractable models for RCA reviews
//!
//! These mirror the JSON structure the reviewer is asked to produce. Every field
//! is defaulted so a partially filled response still deserializes; the strict
//! domain types in [`crate::model::review`] are built from these after validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::Dimension;

/// Complete review as returned by the LLM
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedReview {
    #[serde(default)]
    pub scores: ExtractedScores,
    #[serde(default)]
    pub comments: Vec<ExtractedComment>,
    #[serde(default)]
    pub executive_summary: ExtractedSummary,
}

/// Per-dimension scores; a dimension may be omitted
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedScores {
    #[serde(default)]
    pub incident_clarity: Option<ExtractedDimensionScore>,
    #[serde(default)]
    pub timeline_completeness: Option<ExtractedDimensionScore>,
    #[serde(default)]
    pub root_cause_depth: Option<ExtractedDimensionScore>,
    #[serde(default)]
    pub detection_alerting: Option<ExtractedDimensionScore>,
    #[serde(default)]
    pub corrective_actions: Option<ExtractedDimensionScore>,
    #[serde(default)]
    pub learnings_quality: Option<ExtractedDimensionScore>,
}

impl ExtractedScores {
    pub fn get(&self, dimension: Dimension) -> Option<&ExtractedDimensionScore> {
        match dimension {
            Dimension::IncidentClarity => self.incident_clarity.as_ref(),
            Dimension::TimelineCompleteness => self.timeline_completeness.as_ref(),
            Dimension::RootCauseDepth => self.root_cause_depth.as_ref(),
            Dimension::DetectionAlerting => self.detection_alerting.as_ref(),
            Dimension::CorrectiveActions => self.corrective_actions.as_ref(),
            Dimension::LearningsQuality => self.learnings_quality.as_ref(),
        }
    }

    /// Move the score for a dimension out, leaving `None`
    pub fn take(&mut self, dimension: Dimension) -> Option<ExtractedDimensionScore> {
        match dimension {
            Dimension::IncidentClarity => self.incident_clarity.take(),
            Dimension::TimelineCompleteness => self.timeline_completeness.take(),
            Dimension::RootCauseDepth => self.root_cause_depth.take(),
            Dimension::DetectionAlerting => self.detection_alerting.take(),
            Dimension::CorrectiveActions => self.corrective_actions.take(),
            Dimension::LearningsQuality => self.learnings_quality.take(),
        }
    }
}

/// Score for a single dimension (0-5)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedDimensionScore {
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub rationale: String,
}

/// Inline comment anchored to document text
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedComment {
    #[serde(default)]
    pub issue_id: Option<String>,
    /// One of the seven permitted issue types
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub anchor_text: String,
    #[serde(default)]
    pub comment_body: String,
    #[serde(default)]
    pub resolved: bool,
}

/// Executive summary block
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedSummary {
    #[serde(default)]
    pub overall_interpretation: String,
    #[serde(default)]
    pub leadership_bullets: Vec<String>,
    #[serde(default)]
    pub key_gaps: Vec<String>,
    /// Low, Medium or High
    #[serde(default)]
    pub recurrence_risk: String,
    #[serde(default)]
    pub recurrence_rationale: String,
    #[serde(default)]
    pub action_critique: String,
    #[serde(default)]
    pub improvements: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_addressed_by_dimension_key() {
        let json = r#"{"root_cause_depth": {"score": 2, "rationale": "proximate cause only"}}"#;
        let mut scores: ExtractedScores = serde_json::from_str(json).unwrap();

        for dimension in Dimension::ALL {
            let expected = dimension == Dimension::RootCauseDepth;
            assert_eq!(scores.get(dimension).is_some(), expected, "{}", dimension.key());
        }

        let taken = scores.take(Dimension::RootCauseDepth).unwrap();
        assert_eq!(taken.score, 2);
        assert!(scores.get(Dimension::RootCauseDepth).is_none());
    }
}

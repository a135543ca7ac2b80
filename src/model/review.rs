//! Domain models for RCA analysis results

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Highest score a single dimension can receive
pub const MAX_DIMENSION_SCORE: u8 = 5;

/// Evaluation dimensions of an RCA document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    IncidentClarity,
    TimelineCompleteness,
    RootCauseDepth,
    DetectionAlerting,
    CorrectiveActions,
    LearningsQuality,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::IncidentClarity,
        Dimension::TimelineCompleteness,
        Dimension::RootCauseDepth,
        Dimension::DetectionAlerting,
        Dimension::CorrectiveActions,
        Dimension::LearningsQuality,
    ];

    /// Key used for this dimension in the score record
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::IncidentClarity => "incident_clarity",
            Dimension::TimelineCompleteness => "timeline_completeness",
            Dimension::RootCauseDepth => "root_cause_depth",
            Dimension::DetectionAlerting => "detection_alerting",
            Dimension::CorrectiveActions => "corrective_actions",
            Dimension::LearningsQuality => "learnings_quality",
        }
    }

    /// Reviewer-facing title
    pub fn title(&self) -> &'static str {
        match self {
            Dimension::IncidentClarity => "Incident clarity & impact",
            Dimension::TimelineCompleteness => "Timeline completeness",
            Dimension::RootCauseDepth => "Root cause depth (systemic vs proximate)",
            Dimension::DetectionAlerting => "Detection & alerting rigor",
            Dimension::CorrectiveActions => "Corrective action quality",
            Dimension::LearningsQuality => "Learnings quality",
        }
    }

    /// Question the reviewer answers when scoring this dimension
    pub fn question(&self) -> &'static str {
        match self {
            Dimension::IncidentClarity => {
                "Is the incident clearly described with customer impact?"
            }
            Dimension::TimelineCompleteness => "Is there a clear, detailed timeline?",
            Dimension::RootCauseDepth => {
                "Does the root cause go beyond the trigger to systemic issues?"
            }
            Dimension::DetectionAlerting => {
                "Are detection mechanisms and alerting expectations documented?"
            }
            Dimension::CorrectiveActions => {
                "Are action items preventive (not just reactive)?"
            }
            Dimension::LearningsQuality => "Are learnings meaningful and actionable?",
        }
    }
}

/// Score and rationale for one dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DimensionScore {
    /// Score between 0 and 5
    pub score: u8,
    pub rationale: String,
}

/// Scores for the six evaluation dimensions
///
/// A dimension the reviewer did not score is `None` and is left out of the
/// serialized record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DimensionScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_clarity: Option<DimensionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline_completeness: Option<DimensionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause_depth: Option<DimensionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_alerting: Option<DimensionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrective_actions: Option<DimensionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learnings_quality: Option<DimensionScore>,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> Option<&DimensionScore> {
        match dimension {
            Dimension::IncidentClarity => self.incident_clarity.as_ref(),
            Dimension::TimelineCompleteness => self.timeline_completeness.as_ref(),
            Dimension::RootCauseDepth => self.root_cause_depth.as_ref(),
            Dimension::DetectionAlerting => self.detection_alerting.as_ref(),
            Dimension::CorrectiveActions => self.corrective_actions.as_ref(),
            Dimension::LearningsQuality => self.learnings_quality.as_ref(),
        }
    }

    pub fn set(&mut self, dimension: Dimension, score: DimensionScore) {
        let slot = match dimension {
            Dimension::IncidentClarity => &mut self.incident_clarity,
            Dimension::TimelineCompleteness => &mut self.timeline_completeness,
            Dimension::RootCauseDepth => &mut self.root_cause_depth,
            Dimension::DetectionAlerting => &mut self.detection_alerting,
            Dimension::CorrectiveActions => &mut self.corrective_actions,
            Dimension::LearningsQuality => &mut self.learnings_quality,
        };
        *slot = Some(score);
    }

    /// Dimensions that have no score
    pub fn missing(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|d| self.get(*d).is_none())
            .collect()
    }

    /// Sum of the scored dimensions; unscored dimensions contribute 0
    pub fn total(&self) -> u32 {
        Dimension::ALL
            .iter()
            .filter_map(|d| self.get(*d))
            .map(|s| u32::from(s.score))
            .sum()
    }
}

/// Permitted categories for inline review comments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum IssueType {
    #[serde(rename = "Causality gap")]
    CausalityGap,
    #[serde(rename = "Weak root cause")]
    WeakRootCause,
    #[serde(rename = "Missing detection")]
    MissingDetection,
    #[serde(rename = "Timeline gap")]
    TimelineGap,
    #[serde(rename = "Action item not preventive")]
    ActionItemNotPreventive,
    #[serde(rename = "Vague ownership")]
    VagueOwnership,
    #[serde(rename = "Missing section")]
    MissingSection,
}

impl IssueType {
    pub const ALL: [IssueType; 7] = [
        IssueType::CausalityGap,
        IssueType::WeakRootCause,
        IssueType::MissingDetection,
        IssueType::TimelineGap,
        IssueType::ActionItemNotPreventive,
        IssueType::VagueOwnership,
        IssueType::MissingSection,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IssueType::CausalityGap => "Causality gap",
            IssueType::WeakRootCause => "Weak root cause",
            IssueType::MissingDetection => "Missing detection",
            IssueType::TimelineGap => "Timeline gap",
            IssueType::ActionItemNotPreventive => "Action item not preventive",
            IssueType::VagueOwnership => "Vague ownership",
            IssueType::MissingSection => "Missing section",
        }
    }

    /// Parse a label, ignoring case, surrounding whitespace and `[...]` brackets
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .trim();

        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(normalized))
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inline critique anchored to an excerpt of the reviewed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub issue_id: String,
    pub issue_type: IssueType,
    /// Verbatim excerpt of the document the comment refers to
    pub anchor_text: String,
    /// `[Issue Type]` header, explanation, then a `Recommendation:` line
    pub comment_body: String,
    #[serde(default)]
    pub resolved: bool,
}

/// Likelihood that the incident recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RecurrenceRisk {
    Low,
    Medium,
    High,
}

impl RecurrenceRisk {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RecurrenceRisk::Low),
            "medium" => Some(RecurrenceRisk::Medium),
            "high" => Some(RecurrenceRisk::High),
            _ => None,
        }
    }
}

/// Leadership-facing summary of the review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExecutiveSummary {
    pub overall_interpretation: String,
    pub leadership_bullets: Vec<String>,
    pub key_gaps: Vec<String>,
    /// Absent when the reviewer gave a value outside Low/Medium/High
    pub recurrence_risk: Option<RecurrenceRisk>,
    pub recurrence_rationale: String,
    pub action_critique: String,
    pub improvements: Vec<String>,
}

/// Scored critique of one RCA document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub analysis_id: String,
    pub score: DimensionScores,
    pub total_score: u32,
    pub comments: Vec<Comment>,
    pub executive_summary: ExecutiveSummary,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: u8) -> DimensionScore {
        DimensionScore {
            score: value,
            rationale: "rationale".to_string(),
        }
    }

    #[test]
    fn test_total_sums_present_dimensions() {
        let mut scores = DimensionScores::default();
        scores.set(Dimension::IncidentClarity, score(4));
        scores.set(Dimension::RootCauseDepth, score(2));
        scores.set(Dimension::LearningsQuality, score(5));

        assert_eq!(scores.total(), 11);
        assert_eq!(
            scores.missing(),
            vec![
                Dimension::TimelineCompleteness,
                Dimension::DetectionAlerting,
                Dimension::CorrectiveActions
            ]
        );
    }

    #[test]
    fn test_total_of_full_marks_is_thirty() {
        let mut scores = DimensionScores::default();
        for dimension in Dimension::ALL {
            scores.set(dimension, score(MAX_DIMENSION_SCORE));
        }

        assert_eq!(scores.total(), 30);
        assert!(scores.missing().is_empty());
    }

    #[test]
    fn test_missing_dimensions_are_not_serialized() {
        let mut scores = DimensionScores::default();
        scores.set(Dimension::TimelineCompleteness, score(3));

        let json = serde_json::to_value(&scores).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 1);
        assert_eq!(json["timeline_completeness"]["score"], 3);
    }

    #[test]
    fn test_issue_type_labels() {
        assert_eq!(
            IssueType::from_label("Action item not preventive"),
            Some(IssueType::ActionItemNotPreventive)
        );
        assert_eq!(
            IssueType::from_label("  [timeline GAP] "),
            Some(IssueType::TimelineGap)
        );
        assert_eq!(IssueType::from_label("Typo"), None);

        let json = serde_json::to_string(&IssueType::VagueOwnership).unwrap();
        assert_eq!(json, "\"Vague ownership\"");
    }

    #[test]
    fn test_dimension_keys_match_serialized_names() {
        for dimension in Dimension::ALL {
            let json = serde_json::to_value(dimension).unwrap();
            assert_eq!(json, dimension.key());
        }
    }

    #[test]
    fn test_recurrence_risk_labels() {
        assert_eq!(RecurrenceRisk::from_label("high"), Some(RecurrenceRisk::High));
        assert_eq!(RecurrenceRisk::from_label(" Medium "), Some(RecurrenceRisk::Medium));
        assert_eq!(RecurrenceRisk::from_label("Low|Medium|High"), None);
    }
}

//! Converters from extracted LLM models to domain models

use uuid::Uuid;

use crate::model::extracted::{
    ExtractedComment, ExtractedDimensionScore, ExtractedScores, ExtractedSummary,
};
use crate::model::{
    Comment, Dimension, DimensionScore, DimensionScores, ExecutiveSummary, IssueType,
    MAX_DIMENSION_SCORE, RecurrenceRisk,
};

/// Convert extracted scores to the fixed dimension record
///
/// Scores are expected to be range-checked already; anything outside 0-5 is clamped.
pub fn convert_scores(mut extracted: ExtractedScores) -> DimensionScores {
    let mut scores = DimensionScores::default();

    for dimension in Dimension::ALL {
        if let Some(score) = extracted.take(dimension) {
            scores.set(dimension, convert_dimension_score(score));
        }
    }

    scores
}

fn convert_dimension_score(extracted: ExtractedDimensionScore) -> DimensionScore {
    let score = extracted.score.clamp(0, i64::from(MAX_DIMENSION_SCORE)) as u8;
    DimensionScore {
        score,
        rationale: extracted.rationale,
    }
}

/// Convert extracted comments, dropping those with an unknown issue type
///
/// Comments without an issue id get a fresh one.
pub fn convert_comments(extracted: Vec<ExtractedComment>) -> Vec<Comment> {
    extracted.into_iter().filter_map(convert_comment).collect()
}

fn convert_comment(extracted: ExtractedComment) -> Option<Comment> {
    let issue_type = IssueType::from_label(&extracted.issue_type)?;

    let issue_id = extracted
        .issue_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Some(Comment {
        issue_id,
        issue_type,
        anchor_text: extracted.anchor_text,
        comment_body: extracted.comment_body,
        resolved: extracted.resolved,
    })
}

/// Convert extracted executive summary to domain model
pub fn convert_summary(extracted: ExtractedSummary) -> ExecutiveSummary {
    ExecutiveSummary {
        overall_interpretation: extracted.overall_interpretation,
        leadership_bullets: extracted.leadership_bullets,
        key_gaps: extracted.key_gaps,
        recurrence_risk: RecurrenceRisk::from_label(&extracted.recurrence_risk),
        recurrence_rationale: extracted.recurrence_rationale,
        action_critique: extracted.action_critique,
        improvements: extracted.improvements,
    }
}

//! Validation logic for LLM-extracted RCA reviews
//!
//! Scores outside the 0-5 range invalidate the review. Everything else the
//! reviewer was asked for (bullet counts, comment format, anchors) is checked
//! but only reported as a warning.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::extracted::ExtractedReview;
use crate::model::{Dimension, IssueType, MAX_DIMENSION_SCORE, RecurrenceRisk};

const EXPECTED_LEADERSHIP_BULLETS: usize = 5;
const EXPECTED_KEY_GAPS: usize = 3;
const EXPECTED_IMPROVEMENTS: usize = 3;

/// Result of review validation
#[derive(Debug)]
pub struct ReviewValidationResult {
    /// Whether the review passed validation
    pub is_valid: bool,
    /// Critical errors that indicate invalid output
    pub errors: Vec<String>,
    /// Warnings that indicate potential quality issues
    pub warnings: Vec<String>,
}

impl ReviewValidationResult {
    /// Create a new validation result with no issues
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the validation result
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the validation result
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Validate an extracted review against the reviewed document
///
/// Checks:
/// 1. Every present dimension score is within 0-5 (error)
/// 2. All six dimensions are scored (warning)
/// 3. Comment issue types are one of the permitted values (warning, comment is dropped)
/// 4. Comment bodies follow the `[Issue Type]` / `Recommendation:` format (warning)
/// 5. Anchor text appears in the document (warning)
/// 6. Executive summary cardinalities and recurrence risk (warning)
pub fn validate_extracted_review(
    review: &ExtractedReview,
    document_text: &str,
) -> ReviewValidationResult {
    let mut result = ReviewValidationResult::valid();

    for dimension in Dimension::ALL {
        match review.scores.get(dimension) {
            Some(scored) => {
                if scored.score < 0 || scored.score > i64::from(MAX_DIMENSION_SCORE) {
                    result.add_error(format!(
                        "Dimension '{}' has score {} outside 0-{}",
                        dimension.key(),
                        scored.score,
                        MAX_DIMENSION_SCORE
                    ));
                }
            }
            None => result.add_warning(format!("Dimension '{}' was not scored", dimension.key())),
        }
    }

    let document_lower = document_text.to_lowercase();

    for (i, comment) in review.comments.iter().enumerate() {
        let Some(issue_type) = IssueType::from_label(&comment.issue_type) else {
            result.add_warning(format!(
                "Comment {} has unknown issue type '{}' and will be dropped",
                i + 1,
                comment.issue_type
            ));
            continue;
        };

        if !body_follows_format(&comment.comment_body) {
            result.add_warning(format!(
                "Comment {} ({}) does not follow the [Issue Type] / Recommendation format",
                i + 1,
                issue_type
            ));
        }

        let anchor = comment.anchor_text.trim();
        if anchor.is_empty() {
            result.add_warning(format!("Comment {} has no anchor text", i + 1));
        } else if !document_lower.contains(&anchor.to_lowercase()) {
            result.add_warning(format!(
                "Comment {} anchor '{}' not found in document",
                i + 1,
                anchor.chars().take(80).collect::<String>()
            ));
        }
    }

    let summary = &review.executive_summary;
    check_count(
        &mut result,
        "leadership bullets",
        summary.leadership_bullets.len(),
        EXPECTED_LEADERSHIP_BULLETS,
    );
    check_count(&mut result, "key gaps", summary.key_gaps.len(), EXPECTED_KEY_GAPS);
    check_count(
        &mut result,
        "improvements",
        summary.improvements.len(),
        EXPECTED_IMPROVEMENTS,
    );

    if RecurrenceRisk::from_label(&summary.recurrence_risk).is_none() {
        result.add_warning(format!(
            "Recurrence risk '{}' is not Low, Medium or High",
            summary.recurrence_risk
        ));
    }

    if summary.overall_interpretation.trim().is_empty() {
        result.add_warning("Executive summary lacks an overall interpretation".to_string());
    }

    result
}

fn check_count(result: &mut ReviewValidationResult, field: &str, actual: usize, expected: usize) {
    if actual != expected {
        result.add_warning(format!(
            "Executive summary has {} {} (expected {})",
            actual, field, expected
        ));
    }
}

/// Check for a leading `[Issue Type]` header and a `Recommendation:` line
fn body_follows_format(body: &str) -> bool {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    static RECOMMENDATION: OnceLock<Regex> = OnceLock::new();

    let header = HEADER.get_or_init(|| Regex::new(r"^\s*\[([^\]\n]+)\]").expect("valid regex"));
    let recommendation = RECOMMENDATION
        .get_or_init(|| Regex::new(r"(?mi)^\s*Recommendation:").expect("valid regex"));

    let has_known_header = header
        .captures(body)
        .and_then(|c| c.get(1))
        .is_some_and(|m| IssueType::from_label(m.as_str()).is_some());

    has_known_header && recommendation.is_match(body)
}

//! Prompts for RCA analysis

use crate::model::{Dimension, IssueType};

/// Build the system prompt carrying the rubric and comment rules
pub fn analysis_system_prompt() -> String {
    let mut prompt = String::from(
        "You are an expert Amazon-style RCA (Root Cause Analysis) reviewer. \
You review RCA documents written by engineers and provide rigorous, actionable feedback.\n\n",
    );

    prompt.push_str(&format!(
        "You evaluate RCAs on {} dimensions, each scored 0-5:\n",
        Dimension::ALL.len()
    ));
    for (i, dimension) in Dimension::ALL.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} - {}\n",
            i + 1,
            dimension.title(),
            dimension.question()
        ));
    }

    prompt.push_str("\nFor inline comments, use ONLY these issue types:\n");
    for issue_type in IssueType::ALL {
        prompt.push_str(&format!("- {}\n", issue_type.label()));
    }

    prompt.push_str(
        r#"
Each comment MUST follow this format:
[Issue Type]
Explanation of what is weak or missing.
Recommendation: Specific guidance on how to improve.

Anchor every comment to text copied verbatim from the RCA.

Your output must be structured JSON only and conform to the requested schema."#,
    );

    prompt
}

/// Build the analysis prompt for a document
pub fn build_analysis_prompt(document_text: &str, existing_issue_ids: &[String]) -> String {
    let existing = serde_json::to_string(existing_issue_ids).unwrap_or_else(|_| "[]".to_string());

    let score_keys = Dimension::ALL
        .iter()
        .map(|d| format!("    \"{}\": {{\"score\": 0, \"rationale\": \"...\"}}", d.key()))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"Analyze the following RCA document and provide:

1. Scores for each of the {dimension_count} evaluation dimensions (0-5 each)
2. Inline comments anchored to specific text excerpts
3. An executive summary

Existing issue IDs to preserve (update if still relevant, mark resolved if fixed): {existing}

RCA Document:
---
{document_text}
---

Respond with this exact JSON structure:
{{
  "scores": {{
{score_keys}
  }},
  "comments": [
    {{
      "issue_id": "unique-id-string",
      "issue_type": "one of the {issue_type_count} issue types",
      "anchor_text": "exact text from the RCA to anchor the comment to",
      "comment_body": "[Issue Type]\nExplanation...\nRecommendation: ...",
      "resolved": false
    }}
  ],
  "executive_summary": {{
    "overall_interpretation": "one line interpretation",
    "leadership_bullets": ["bullet1", "bullet2", "bullet3", "bullet4", "bullet5"],
    "key_gaps": ["gap1", "gap2", "gap3"],
    "recurrence_risk": "Low|Medium|High",
    "recurrence_rationale": "one line rationale",
    "action_critique": "paragraph about action items",
    "improvements": ["improvement1", "improvement2", "improvement3"]
  }}
}}"#,
        dimension_count = Dimension::ALL.len(),
        issue_type_count = IssueType::ALL.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_rubric_and_issue_types() {
        let prompt = analysis_system_prompt();

        for dimension in Dimension::ALL {
            assert!(prompt.contains(dimension.title()));
        }
        for issue_type in IssueType::ALL {
            assert!(prompt.contains(&format!("- {}\n", issue_type.label())));
        }
        assert!(prompt.contains("Recommendation:"));
    }

    #[test]
    fn test_analysis_prompt_embeds_document_and_existing_ids() {
        let document = "Incident: outage.\nRoot cause: unknown.";
        let ids = vec!["issue-1".to_string(), "issue-2".to_string()];

        let prompt = build_analysis_prompt(document, &ids);

        assert!(prompt.contains("---\nIncident: outage.\nRoot cause: unknown.\n---"));
        assert!(prompt.contains(r#"["issue-1","issue-2"]"#));
        for dimension in Dimension::ALL {
            assert!(prompt.contains(&format!("\"{}\"", dimension.key())));
        }
    }

    #[test]
    fn test_analysis_prompt_without_existing_ids() {
        let prompt = build_analysis_prompt("doc", &[]);
        assert!(prompt.contains("mark resolved if fixed): []"));
    }
}

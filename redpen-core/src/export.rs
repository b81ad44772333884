use anyhow::{Context, Result};
use serde::Serialize;

use crate::diff::DiffSegment;
use crate::model::{Category, Correction, Review};

/// Export format for a finished review
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReview {
    pub id: String,
    pub created_at: String,
    pub tone: String,
    pub dialect: String,
    pub feedback: String,
    pub original_text: String,
    pub rewritten_text: String,
    pub highlighted_html: String,
    pub original_segments: Vec<DiffSegment>,
    pub corrected_segments: Vec<DiffSegment>,
    pub corrections: Vec<ExportCorrection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCorrection {
    pub index: usize,
    pub original: String,
    pub correction: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub explanation: String,
    pub examples: Vec<String>,
    pub placed: bool,
}

impl ExportCorrection {
    fn new(index: usize, correction: &Correction, placed: bool) -> Self {
        Self {
            index,
            original: correction.original.clone(),
            correction: correction.replacement.clone(),
            kind: correction.kind.clone(),
            explanation: correction.explanation.clone(),
            examples: correction.examples.clone(),
            placed,
        }
    }
}

impl From<&Review> for ExportReview {
    fn from(review: &Review) -> Self {
        let analysis = review.analyze();
        let corrections = review
            .corrections()
            .iter()
            .enumerate()
            .map(|(i, c)| ExportCorrection::new(i, c, analysis.is_placed(i)))
            .collect();

        Self {
            id: review.id.to_string(),
            created_at: review.created_at.to_rfc3339(),
            tone: review.tone.as_str().to_string(),
            dialect: review.dialect.as_str().to_string(),
            feedback: review.response.feedback.clone(),
            original_text: review.original().plain_text(),
            rewritten_text: review.rewritten().plain_text(),
            highlighted_html: analysis.highlighted.to_html(),
            original_segments: analysis.diff.original,
            corrected_segments: analysis.diff.corrected,
            corrections,
        }
    }
}

/// Serialize a review for export
pub fn to_json(review: &Review) -> Result<String> {
    let export = ExportReview::from(review);
    serde_json::to_string_pretty(&export).context("Failed to serialize review")
}

/// Generate a Markdown summary of a review's corrections
pub fn generate_summary(review: &Review) -> String {
    let analysis = review.analyze();
    let corrections = review.corrections();
    let mut summary = String::new();

    summary.push_str(&format!(
        "## Review ({}, {})\n\n",
        review.tone.as_str(),
        review.dialect.as_str()
    ));

    if !review.response.feedback.trim().is_empty() {
        summary.push_str(&format!("> {}\n\n", review.response.feedback.trim()));
    }

    if corrections.is_empty() {
        summary.push_str("No corrections.\n");
        return summary;
    }

    summary.push_str(&format!("### Corrections ({} items)\n\n", corrections.len()));

    // Group by category
    for category in Category::all() {
        let items: Vec<_> = corrections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.category() == Some(*category))
            .collect();

        if items.is_empty() {
            continue;
        }

        summary.push_str(&format!("#### {} ({})\n\n", category.as_str(), items.len()));

        for (index, correction) in items {
            summary.push_str(&format!(
                "{}. **\"{}\"** -> **\"{}\"**{}\n",
                index + 1,
                correction.original,
                correction.replacement,
                if analysis.is_placed(index) { "" } else { " (not located)" }
            ));
            if !correction.explanation.is_empty() {
                summary.push_str(&format!("   - {}\n", correction.explanation));
            }
            for example in &correction.examples {
                summary.push_str(&format!("   - e.g. {example}\n"));
            }
        }
        summary.push('\n');
    }

    let unknown: Vec<_> = corrections
        .iter()
        .filter(|c| c.category().is_none())
        .collect();
    if !unknown.is_empty() {
        summary.push_str(&format!("#### Uncategorized ({})\n\n", unknown.len()));
        for correction in unknown {
            summary.push_str(&format!(
                "- \"{}\" -> \"{}\" (type '{}')\n",
                correction.original, correction.replacement, correction.kind
            ));
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dialect, GrammarResponse, Tone};

    fn sample_review() -> Review {
        let mut aside = Correction::new("wot", "what", Category::Spelling, "Standard spelling.");
        aside.examples = vec!["What time is it?".to_string()];
        let mut odd = Correction::new("a", "b", Category::Tone, "");
        odd.kind = "style".to_string();

        Review::new(
            "<p>Their are to many cats.</p>".to_string(),
            Tone::Email,
            Dialect::British,
            GrammarResponse {
                rewritten_text: "<p>There are too many cats.</p>".to_string(),
                feedback: "Mind your homophones.".to_string(),
                corrections: vec![
                    Correction::new("Their", "There", Category::Grammar, "Existential there."),
                    aside,
                    odd,
                ],
            },
        )
    }

    #[test]
    fn test_export_format() {
        let json = to_json(&sample_review()).unwrap();

        // Verify camelCase field names
        assert!(json.contains("\"originalText\": \"Their are to many cats.\""));
        assert!(json.contains("\"rewrittenText\": \"There are too many cats.\""));
        assert!(json.contains("\"tone\": \"Email (Professional)\""));
        assert!(json.contains("\"originalSegments\""));
        assert!(json.contains("\"kind\": \"removed\""));
        assert!(json.contains("\"type\": \"grammar\""));
        assert!(json.contains("data-correction-index=\\\"0\\\""));
    }

    #[test]
    fn test_export_marks_placement() {
        let export = ExportReview::from(&sample_review());
        let placed: Vec<bool> = export.corrections.iter().map(|c| c.placed).collect();
        assert_eq!(placed, vec![true, false, false]);
    }

    #[test]
    fn test_summary_groups_by_category() {
        let summary = generate_summary(&sample_review());

        assert!(summary.starts_with("## Review (Email (Professional), British)"));
        assert!(summary.contains("> Mind your homophones."));
        assert!(summary.contains("#### Spelling (1)"));
        assert!(summary.contains("2. **\"wot\"** -> **\"what\"** (not located)"));
        assert!(summary.contains("   - e.g. What time is it?"));
        assert!(summary.contains("#### Grammar (1)"));
        assert!(summary.contains("1. **\"Their\"** -> **\"There\"**\n"));
        assert!(summary.contains("#### Uncategorized (1)"));
    }
}

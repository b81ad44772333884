use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Correction, Dialect, Document, GrammarResponse, Tone};
use crate::diff::{self, Diff};
use crate::highlight;

/// One round trip to the correction service: the submitted text, the
/// settings it was sent with, and the model's reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub original_html: String,
    pub tone: Tone,
    pub dialect: Dialect,
    pub response: GrammarResponse,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(original_html: String, tone: Tone, dialect: Dialect, response: GrammarResponse) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_html,
            tone,
            dialect,
            response,
            created_at: Utc::now(),
        }
    }

    pub fn corrections(&self) -> &[Correction] {
        &self.response.corrections
    }

    pub fn original(&self) -> Document {
        Document::parse(&self.original_html)
    }

    pub fn rewritten(&self) -> Document {
        Document::parse(&self.response.rewritten_text)
    }

    /// Run both engines over this review
    pub fn analyze(&self) -> Analysis {
        let original = self.original();
        let rewritten = self.rewritten();

        let diff = diff::diff(&original, &rewritten);
        let (highlighted, placed) =
            highlight::annotate_with_placements(&rewritten, self.corrections());

        Analysis {
            diff,
            highlighted,
            placed,
        }
    }
}

/// Output of both engines for one review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub diff: Diff,
    pub highlighted: Document,
    /// Indices of corrections that received a marker, in document order
    pub placed: Vec<usize>,
}

impl Analysis {
    pub fn is_placed(&self, index: usize) -> bool {
        self.placed.contains(&index)
    }
}

//! Word-level diff between an original and a corrected document
//!
//! Both plain-text projections are split into word and whitespace tokens and
//! aligned with a longest-common-subsequence table. Token equality ignores
//! case, so capitalization-only fixes show up as unchanged text.

use serde::{Deserialize, Serialize};

use crate::model::Document;
use crate::text::{eq_ignore_case, tokenize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Unchanged,
    Added,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSegment {
    pub text: String,
    pub kind: SegmentKind,
}

impl DiffSegment {
    pub fn new(text: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn unchanged(text: impl Into<String>) -> Self {
        Self::new(text, SegmentKind::Unchanged)
    }

    pub fn added(text: impl Into<String>) -> Self {
        Self::new(text, SegmentKind::Added)
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self::new(text, SegmentKind::Removed)
    }
}

/// Two parallel segment sequences, one per side
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diff {
    #[serde(rename = "originalSegments")]
    pub original: Vec<DiffSegment>,
    #[serde(rename = "correctedSegments")]
    pub corrected: Vec<DiffSegment>,
}

impl Diff {
    /// True when either side has added or removed text
    pub fn has_changes(&self) -> bool {
        self.original
            .iter()
            .chain(&self.corrected)
            .any(|segment| segment.kind != SegmentKind::Unchanged)
    }

    /// Number of removed runs on the original side and added runs on the
    /// corrected side
    pub fn change_counts(&self) -> (usize, usize) {
        let removed = self
            .original
            .iter()
            .filter(|s| s.kind == SegmentKind::Removed)
            .count();
        let added = self
            .corrected
            .iter()
            .filter(|s| s.kind == SegmentKind::Added)
            .count();
        (removed, added)
    }
}

/// Diff two documents by their plain-text projections
pub fn diff(original: &Document, corrected: &Document) -> Diff {
    diff_text(&original.plain_text(), &corrected.plain_text())
}

/// Diff two HTML fragments
pub fn diff_html(original_html: &str, corrected_html: &str) -> Diff {
    diff(&Document::parse(original_html), &Document::parse(corrected_html))
}

/// Diff two plain texts
pub fn diff_text(original: &str, corrected: &str) -> Diff {
    let original_tokens = tokenize(original);
    let corrected_tokens = tokenize(corrected);

    match (original_tokens.is_empty(), corrected_tokens.is_empty()) {
        (true, true) => return Diff::default(),
        (true, false) => {
            return Diff {
                original: Vec::new(),
                corrected: vec![DiffSegment::added(corrected)],
            }
        }
        (false, true) => {
            return Diff {
                original: vec![DiffSegment::removed(original)],
                corrected: Vec::new(),
            }
        }
        (false, false) => {}
    }

    let table = LcsTable::build(&original_tokens, &corrected_tokens);
    let (original_segments, corrected_segments) =
        table.backtrack(&original_tokens, &corrected_tokens);

    log::debug!(
        "diff: {} x {} tokens, {} common",
        original_tokens.len(),
        corrected_tokens.len(),
        table.length()
    );

    Diff {
        original: merge_segments(original_segments),
        corrected: merge_segments(corrected_segments),
    }
}

/// Row-major (m + 1) x (n + 1) table of LCS lengths over token prefixes
struct LcsTable {
    cells: Vec<u32>,
    width: usize,
}

impl LcsTable {
    fn build(a: &[&str], b: &[&str]) -> Self {
        let width = b.len() + 1;
        let mut cells = vec![0u32; (a.len() + 1) * width];

        for i in 1..=a.len() {
            for j in 1..=b.len() {
                cells[i * width + j] = if eq_ignore_case(a[i - 1], b[j - 1]) {
                    cells[(i - 1) * width + (j - 1)] + 1
                } else {
                    cells[(i - 1) * width + j].max(cells[i * width + (j - 1)])
                };
            }
        }

        Self { cells, width }
    }

    fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.width + j]
    }

    fn length(&self) -> u32 {
        self.cells.last().copied().unwrap_or(0)
    }

    /// Walk back from the bottom-right corner. On a mismatch the corrected
    /// side is consumed first whenever that keeps the LCS length.
    fn backtrack<'t>(&self, a: &[&'t str], b: &[&'t str]) -> (Vec<DiffSegment>, Vec<DiffSegment>) {
        let mut original = Vec::new();
        let mut corrected = Vec::new();
        let (mut i, mut j) = (a.len(), b.len());

        while i > 0 || j > 0 {
            if i > 0 && j > 0 && eq_ignore_case(a[i - 1], b[j - 1]) {
                original.push(DiffSegment::unchanged(a[i - 1]));
                corrected.push(DiffSegment::unchanged(b[j - 1]));
                i -= 1;
                j -= 1;
            } else if j > 0 && (i == 0 || self.get(i, j - 1) >= self.get(i - 1, j)) {
                corrected.push(DiffSegment::added(b[j - 1]));
                j -= 1;
            } else {
                original.push(DiffSegment::removed(a[i - 1]));
                i -= 1;
            }
        }

        original.reverse();
        corrected.reverse();
        (original, corrected)
    }
}

/// Merge runs of adjacent segments that share a kind
fn merge_segments(segments: Vec<DiffSegment>) -> Vec<DiffSegment> {
    let mut merged: Vec<DiffSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match merged.last_mut() {
            Some(last) if last.kind == segment.kind => last.text.push_str(&segment.text),
            _ => merged.push(segment),
        }
    }
    merged
}

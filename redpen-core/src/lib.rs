//! Redpen Core - Platform-agnostic correction review library
//!
//! This crate provides the word-level diff engine, the inline correction
//! highlighter, and the data structures shared by the Redpen front ends.
//! It's designed to work both in native CLI and WASM environments.

pub mod app;
pub mod diff;
pub mod error;
pub mod export;
pub mod highlight;
pub mod markup;
pub mod model;
pub mod service;
pub mod text;

pub use app::{App, Focus, Mode, View};
pub use diff::{diff, diff_html, diff_text, Diff, DiffSegment, SegmentKind};
pub use error::{ParseEnumError, ServiceError};
pub use export::{generate_summary, to_json, ExportCorrection, ExportReview};
pub use highlight::{
    annotate, annotate_with_placements, highlight_corrections_in_html, highlight_runs,
    placed_corrections, HighlightRun, Marker,
};
pub use model::{
    Analysis, Category, Correction, CorrectionRequest, Dialect, Document, Element,
    GrammarResponse, Node, Review, TextRange, Tone,
};
pub use service::parse_response;

pub mod correction;
pub mod document;
pub mod request;
pub mod review;
pub mod text_range;

pub use correction::{Category, Correction, GrammarResponse};
pub use document::{Document, Element, Node};
pub use request::{CorrectionRequest, Dialect, Tone};
pub use review::{Analysis, Review};
pub use text_range::TextRange;

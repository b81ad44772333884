use serde::{Deserialize, Serialize};

/// Correction category reported by the model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spelling,
    Grammar,
    Tone,
    Punctuation,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Spelling,
            Category::Grammar,
            Category::Tone,
            Category::Punctuation,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Spelling => "Spelling",
            Category::Grammar => "Grammar",
            Category::Tone => "Tone",
            Category::Punctuation => "Punctuation",
        }
    }

    /// Wire name, also used as the marker class suffix
    pub fn key(&self) -> &'static str {
        match self {
            Category::Spelling => "spelling",
            Category::Grammar => "grammar",
            Category::Tone => "tone",
            Category::Punctuation => "punctuation",
        }
    }

    pub fn css_class(&self) -> String {
        format!("correction-{}", self.key())
    }

    /// Map a wire `type` string to a category. Unknown values are `None`.
    pub fn parse(value: &str) -> Option<Category> {
        Category::all()
            .iter()
            .copied()
            .find(|category| category.key() == value)
    }
}

/// One discrete change suggested by the model.
///
/// Every field defaults when missing so that one malformed entry cannot fail
/// a whole response; such entries are simply ineligible for highlighting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Correction {
    pub original: String,
    #[serde(rename = "correction")]
    pub replacement: String,
    pub explanation: String,
    /// Raw `type` from the wire, see [`Correction::category`]
    #[serde(rename = "type")]
    pub kind: String,
    pub examples: Vec<String>,
}

impl Correction {
    pub fn new(original: &str, replacement: &str, category: Category, explanation: &str) -> Self {
        Self {
            original: original.to_string(),
            replacement: replacement.to_string(),
            explanation: explanation.to_string(),
            kind: category.key().to_string(),
            examples: Vec::new(),
        }
    }

    pub fn category(&self) -> Option<Category> {
        Category::parse(&self.kind)
    }

    /// Whether this correction can be placed in a document
    pub fn is_eligible(&self) -> bool {
        !self.replacement.trim().is_empty() && self.category().is_some()
    }
}

/// Success body of the correction service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GrammarResponse {
    pub rewritten_text: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub corrections: Vec<Correction>,
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseEnumError, ServiceError};

/// Target tone of the rewrite
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tone {
    #[default]
    #[serde(rename = "Original (Grammar Fix Only)", alias = "original")]
    Original,
    #[serde(rename = "Chat (Casual/WhatsApp)", alias = "chat")]
    Chat,
    #[serde(rename = "Email (Professional)", alias = "email")]
    Email,
    #[serde(rename = "Speaking (Natural Flow)", alias = "speaking")]
    Speaking,
}

impl Tone {
    pub fn all() -> &'static [Tone] {
        &[Tone::Original, Tone::Chat, Tone::Email, Tone::Speaking]
    }

    /// Label sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Original => "Original (Grammar Fix Only)",
            Tone::Chat => "Chat (Casual/WhatsApp)",
            Tone::Email => "Email (Professional)",
            Tone::Speaking => "Speaking (Natural Flow)",
        }
    }

    pub fn short(&self) -> &'static str {
        match self {
            Tone::Original => "original",
            Tone::Chat => "chat",
            Tone::Email => "email",
            Tone::Speaking => "speaking",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::all()
            .iter()
            .copied()
            .find(|tone| tone.short().eq_ignore_ascii_case(s) || tone.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("tone", s))
    }
}

/// English dialect to enforce
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    #[serde(alias = "british")]
    British,
    #[serde(alias = "american")]
    American,
}

impl Dialect {
    pub fn all() -> &'static [Dialect] {
        &[Dialect::British, Dialect::American]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::British => "British",
            Dialect::American => "American",
        }
    }

    /// Heading shown above the model's feedback
    pub fn report_title(&self) -> &'static str {
        match self {
            Dialect::British => "Chief Inspector's Report",
            Dialect::American => "Sheriff's Report",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::all()
            .iter()
            .copied()
            .find(|dialect| dialect.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError::new("dialect", s))
    }
}

/// POST body for the correction service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorrectionRequest {
    pub text: String,
    pub tone: Tone,
    pub dialect: Dialect,
}

impl CorrectionRequest {
    pub fn new(text: impl Into<String>, tone: Tone, dialect: Dialect) -> Self {
        Self {
            text: text.into(),
            tone,
            dialect,
        }
    }

    /// Reject requests the service would answer with 400
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.text.trim().is_empty() {
            return Err(ServiceError::MissingFields);
        }
        Ok(())
    }
}

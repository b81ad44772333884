use thiserror::Error;

/// Failures at the correction service boundary
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    RateLimited(String),

    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("Missing required fields: text, tone, dialect")]
    MissingFields,

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ServiceError::RateLimited(_))
    }

    /// HTTP status associated with the failure, if it came from the service
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::RateLimited(_) => Some(429),
            ServiceError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

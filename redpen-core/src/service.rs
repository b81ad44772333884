//! Interpreting responses from the correction service
//!
//! The service itself is external. These helpers turn a raw status and body
//! into either a [`GrammarResponse`] or a classified [`ServiceError`].

use serde::Deserialize;

use crate::error::ServiceError;
use crate::model::GrammarResponse;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Parse a service reply. Non-2xx statuses become errors, never panics.
pub fn parse_response(status: u16, body: &str) -> Result<GrammarResponse, ServiceError> {
    if !(200..300).contains(&status) {
        return Err(classify_failure(status, body));
    }

    let response: GrammarResponse = serde_json::from_str(body)?;
    log::debug!(
        "service response: {} corrections, {} bytes of rewritten text",
        response.corrections.len(),
        response.rewritten_text.len()
    );
    Ok(response)
}

/// Classify a non-2xx reply using its `{ error }` body when present
pub fn classify_failure(status: u16, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty());

    if status == 429 {
        return ServiceError::RateLimited(message.unwrap_or_else(|| RATE_LIMIT_MESSAGE.to_string()));
    }

    ServiceError::Request {
        status,
        message: message.unwrap_or_else(|| format!("HTTP {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_success_body_parses() {
        let body = r#"{"rewrittenText":"Hi.","feedback":"","corrections":[]}"#;
        let response = parse_response(200, body).unwrap();
        assert_eq!(response.rewritten_text, "Hi.");
    }

    #[test]
    fn test_success_with_garbage_body_is_malformed() {
        let err = parse_response(200, "not json").unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)));
        assert_eq!(err.status(), None);
    }

    #[rstest]
    #[case(429, r#"{"error":"Rate limit exceeded. Please try again later."}"#)]
    #[case(429, "")]
    fn test_rate_limit_is_distinct(#[case] status: u16, #[case] body: &str) {
        let err = parse_response(status, body).unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), RATE_LIMIT_MESSAGE);
    }

    #[rstest]
    #[case(400, r#"{"error":"Missing required fields: text, tone, dialect"}"#, "Missing required fields: text, tone, dialect")]
    #[case(500, r#"{"error":"Failed to process grammar correction"}"#, "Failed to process grammar correction")]
    #[case(502, "<html>Bad Gateway</html>", "HTTP 502")]
    #[case(404, r#"{"error":""}"#, "HTTP 404")]
    fn test_failure_message(#[case] status: u16, #[case] body: &str, #[case] expected: &str) {
        let err = parse_response(status, body).unwrap_err();
        assert!(!err.is_rate_limited());
        assert_eq!(err.status(), Some(status));
        assert_eq!(err.to_string(), expected);
    }
}

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized - sign in again")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The `{"error": "..."}` envelope the server wraps failures in.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull the server's message out of the error envelope, falling back to the raw body.
    fn message(body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error,
            Err(_) => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::message(body);
        match status.as_u16() {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_extracts_envelope_message() {
        let err = ApiError::from_status(
            StatusCode::NOT_FOUND,
            r#"{"error": "Athlete not found"}"#,
        );
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Athlete not found"));
        assert_eq!(err.to_string(), "Resource not found: Athlete not found");
    }

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(
                StatusCode::BAD_REQUEST,
                r#"{"error": "Athlete name must be at least 2 characters"}"#
            ),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let ApiError::ServerError(message) = err else {
            panic!("expected server error");
        };
        assert!(message.starts_with(&"x".repeat(500)));
        assert!(message.ends_with("(truncated, 2000 total bytes)"));
    }
}

//! Error types for Asana API operations.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::request::HttpMethod;

/// Errors that can occur during Asana API operations.
#[derive(Debug, Error)]
pub enum AsanaError {
    /// A required parameter was not supplied. Nothing was sent over the wire.
    #[error("{operation}: missing required parameter `{name}`")]
    MissingParameter {
        operation: &'static str,
        name: &'static str,
    },

    /// A parameter was supplied with a value the API cannot accept.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A path template still has a placeholder with no value.
    #[error("invalid path '{template}': placeholder `{placeholder}` is unresolved")]
    InvalidPath {
        template: String,
        placeholder: String,
    },

    /// The API answered with a non-2xx status.
    #[error("{method} {path} failed with status {status}: {body}")]
    Api {
        status: u16,
        method: HttpMethod,
        path: String,
        body: ErrorBody,
        retry_after_secs: Option<u64>,
    },

    /// A 2xx response whose body is not JSON or has no usable envelope.
    #[error("malformed response for {method} {path}: {reason}")]
    MalformedResponse {
        method: HttpMethod,
        path: String,
        reason: String,
    },

    /// Strict typing is enabled and the discriminator contradicts the expected type.
    #[error("expected resource type `{expected}`, found `{found}`")]
    ResourceTypeMismatch { expected: String, found: String },

    /// No stub is registered for the request (test transport only).
    #[error("no stub registered for {method} {path}")]
    UnstubbedRequest { method: HttpMethod, path: String },

    /// Configuration is missing or incomplete.
    #[error("Asana configuration required: {0}")]
    ConfigMissing(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON decoding error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl AsanaError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API rejected the request for exceeding the rate limit.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

/// Body of a failed response: decoded JSON when possible, the raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Raw(String),
}

impl ErrorBody {
    /// Decode a raw error body, falling back to lossy text.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(json) => Self::Json(json),
            Err(_) => Self::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Human-readable message. Asana reports `{"errors": [{"message": ...}]}`.
    pub fn message(&self) -> String {
        match self {
            Self::Json(json) => {
                let messages: Vec<&str> = json
                    .get("errors")
                    .and_then(Value::as_array)
                    .map(|errors| {
                        errors
                            .iter()
                            .filter_map(|e| e.get("message").and_then(Value::as_str))
                            .collect()
                    })
                    .unwrap_or_default();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
                if let Some(msg) = json.get("message").and_then(Value::as_str) {
                    return msg.to_string();
                }
                json.to_string()
            }
            Self::Raw(text) if text.is_empty() => "<empty body>".to_string(),
            Self::Raw(text) => text.clone(),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result type alias for Asana operations.
pub type Result<T> = core::result::Result<T, AsanaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_prefers_asana_messages() {
        let body = ErrorBody::from_bytes(
            br#"{"errors":[{"message":"workspace: Missing input"},{"message":"limit: Not a number"}]}"#,
        );
        assert_eq!(body.message(), "workspace: Missing input; limit: Not a number");
    }

    #[test]
    fn test_error_body_keeps_raw_text() {
        let body = ErrorBody::from_bytes(b"<html>Bad Gateway</html>");
        assert_eq!(body, ErrorBody::Raw("<html>Bad Gateway</html>".to_string()));
    }

    #[test]
    fn test_api_error_display_names_request() {
        let err = AsanaError::Api {
            status: 404,
            method: HttpMethod::Get,
            path: "/users/42".to_string(),
            body: ErrorBody::Json(json!({"errors": [{"message": "Not Found"}]})),
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "GET /users/42 failed with status 404: Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_missing_parameter_display() {
        let err = AsanaError::MissingParameter {
            operation: "User::find_by_workspace",
            name: "workspace",
        };
        assert!(err.to_string().contains("`workspace`"));
        assert!(err.to_string().contains("User::find_by_workspace"));
    }
}

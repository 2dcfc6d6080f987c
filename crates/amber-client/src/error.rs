//! Client error types

use serde_json::Value;
use thiserror::Error;

/// Message used when the API rejects a request without saying why
pub const REQUEST_FAILED: &str = "Request failed";

/// Message used when a transport failure carries no text of its own
pub const NETWORK_ERROR: &str = "Network error";

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request error (connection refused, reset, timed out...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not JSON
    #[error("Invalid JSON body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The API answered with a non-success status
    #[error("{}", .message.as_deref().unwrap_or(REQUEST_FAILED))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// A success body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request body could not be serialized
    #[error("Could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an API error from the status and the parsed error body
    pub fn from_api_body(status: u16, body: &Value) -> Self {
        let message = ErrorEnvelope::from_value(body).error;
        Self::Api { status, message }
    }

    /// The diagnostic string surfaced to callers through an `Outcome`.
    ///
    /// API errors carry the server's message verbatim, transport and parse
    /// failures carry their own text.
    pub fn message(&self) -> String {
        match self {
            Self::Http(err) => transport_message(err.to_string()),
            Self::Decode(err) | Self::Encode(err) => err.to_string(),
            Self::InvalidResponse(msg) | Self::Config(msg) => msg.clone(),
            Self::Api { .. } => self.to_string(),
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the request never produced a response
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Text of a transport failure, or [`NETWORK_ERROR`] when it has none
fn transport_message(text: String) -> String {
    if text.is_empty() {
        NETWORK_ERROR.to_string()
    } else {
        text
    }
}

/// Shape of an error body: `{"error": "..."}`, every field optional
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: Option<String>,
}

impl ErrorEnvelope {
    /// Read the envelope out of an arbitrary JSON value.
    ///
    /// Non-object bodies, non-string and empty `error` fields all count as
    /// "no message".
    pub fn from_value(body: &Value) -> Self {
        let error = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_uses_body_message() {
        let error = ClientError::from_api_body(403, &json!({ "error": "Quota exceeded" }));

        match &error {
            ClientError::Api { status, message } => {
                assert_eq!(*status, 403);
                assert_eq!(message.as_deref(), Some("Quota exceeded"));
            }
            _ => panic!("Expected Api error"),
        }
        assert_eq!(error.message(), "Quota exceeded");
    }

    #[test]
    fn test_api_error_fallback_message() {
        let bodies = [
            json!({}),
            json!({ "error": "" }),
            json!({ "error": 42 }),
            json!([1, 2]),
            Value::Null,
        ];
        for body in bodies {
            let error = ClientError::from_api_body(500, &body);
            assert_eq!(error.message(), REQUEST_FAILED, "body: {body}");
        }
    }

    #[test]
    fn test_not_found() {
        let error = ClientError::from_api_body(404, &json!({ "error": "File not found" }));
        assert!(error.is_not_found());
        assert!(!error.is_network());
    }

    #[test]
    fn test_transport_message_fallback() {
        assert_eq!(transport_message(String::new()), NETWORK_ERROR);
        assert_eq!(
            transport_message("connection refused".to_string()),
            "connection refused"
        );
    }

    #[test]
    fn test_decode_error_message() {
        let err = serde_json::from_str::<Value>("<html>").unwrap_err();
        let expected = err.to_string();
        assert_eq!(ClientError::Decode(err).message(), expected);
    }
}

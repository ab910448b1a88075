//! Error types for Buddy API operations

use thiserror::Error;

/// Buddy API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ============ Transport Errors ============
    /// Network or TLS failure while issuing the request
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be read
    #[error("Failed to read response body (HTTP {status}) with the following error message: {source}")]
    BodyRead {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    // ============ Protocol Errors ============
    /// Server answered with something other than the single expected code
    #[error(
        "Expected return code is {expected} but got {status} with the following response body {body}"
    )]
    UnexpectedStatus {
        expected: u16,
        status: u16,
        body: String,
    },

    /// Payload could not be encoded or a successful response could not be decoded
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    // ============ Configuration Errors ============
    #[error("Invalid client configuration: {message}")]
    InvalidConfig { message: String },
}

impl ApiError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } | ApiError::BodyRead { status, .. } => {
                Some(*status)
            }
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the server reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for Buddy API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message_embeds_code_and_body() {
        let err = ApiError::UnexpectedStatus {
            expected: 201,
            status: 500,
            body: "{\"errors\":[{\"message\":\"boom\"}]}".to_string(),
        };
        let message = err.to_string();

        assert!(message.contains("201"));
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_is_not_found() {
        let err = ApiError::UnexpectedStatus {
            expected: 204,
            status: 404,
            body: String::new(),
        };
        assert!(err.is_not_found());

        let err = ApiError::InvalidConfig {
            message: "x".to_string(),
        };
        assert!(!err.is_not_found());
    }
}

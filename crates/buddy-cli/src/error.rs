//! CLI error types with exit code handling
//!
//! Library errors are folded into a few user-facing categories, each with its
//! own exit code.

use buddy_client::ApiError;
use buddy_core::CoreError;
use buddy_provider::ProviderError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

const CONFIG_HELP: &str =
    "Set BUDDY_URL and BUDDY_TOKEN, pass --url and --token, or write them to the config file";

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Connection settings are missing or invalid
    #[error("Configuration error: {message}")]
    #[diagnostic(code(buddy::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The request itself is not acceptable
    #[error("Invalid input: {message}")]
    #[diagnostic(code(buddy::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The API call failed
    #[error("API error: {message}")]
    #[diagnostic(code(buddy::cli::api))]
    Api { message: String },

    /// The requested object does not exist
    #[error("{message}")]
    #[diagnostic(code(buddy::cli::not_found))]
    NotFound { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(buddy::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(buddy::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } | CliError::Input { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Api { .. } => exit_codes::API_ERROR,
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a not-found error for a resource
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound {
            message: format!("{} not found", what),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
            CoreError::InvalidId { .. } | CoreError::InvalidVariableType { .. } => {
                CliError::Input {
                    message: err.to_string(),
                    help: None,
                }
            }
            other => CliError::Config {
                message: other.to_string(),
                help: Some(CONFIG_HELP.to_string()),
            },
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidConfig { message } => CliError::Config {
                message,
                help: Some(CONFIG_HELP.to_string()),
            },
            other if other.is_not_found() => CliError::NotFound {
                message: other.to_string(),
            },
            other => CliError::Api {
                message: other.to_string(),
            },
        }
    }
}

impl From<ProviderError> for CliError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Api(e) => e.into(),
            ProviderError::Core(e) => e.into(),
            ProviderError::RequiresReplacement { .. } => CliError::Input {
                message: err.to_string(),
                help: Some("Delete the resource and create it again".to_string()),
            },
            ProviderError::InvalidId { .. } => CliError::Input {
                message: err.to_string(),
                help: None,
            },
            ProviderError::UserNotFound { .. } | ProviderError::Gone { .. } => {
                CliError::NotFound {
                    message: err.to_string(),
                }
            }
            other => CliError::internal(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_config_error() {
        let err: CliError = CoreError::MissingField {
            field: "token".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_ERROR);
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_user_not_found_exit_code() {
        let err: CliError = ProviderError::UserNotFound {
            email: "x@y.z".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(err.to_string(), "User not found: x@y.z");
    }

    #[test]
    fn test_api_status_mapping() {
        let missing: CliError = ApiError::UnexpectedStatus {
            expected: 204,
            status: 404,
            body: String::new(),
        }
        .into();
        assert_eq!(missing.exit_code(), exit_codes::NOT_FOUND);

        let failed: CliError = ApiError::UnexpectedStatus {
            expected: 201,
            status: 500,
            body: "boom".to_string(),
        }
        .into();
        assert_eq!(failed.exit_code(), exit_codes::API_ERROR);
        assert!(failed.to_string().contains("boom"));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            CliError::not_found("variable 42").to_string(),
            "variable 42 not found"
        );
    }
}

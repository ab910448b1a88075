//! Error types for buddy-provider

use buddy_client::ApiError;
use buddy_core::CoreError;
use thiserror::Error;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors raised while managing Buddy resources
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// The API call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration or model error
    #[error(transparent)]
    Core(CoreError),

    /// The change cannot be applied in place
    #[error("{resource}: changing '{field}' requires replacing the resource")]
    RequiresReplacement { resource: String, field: String },

    /// Email lookup found nobody
    #[error("User not found: {email}")]
    UserNotFound { email: String },

    /// Resource id could not be parsed
    #[error("invalid {resource} id '{id}': {reason}")]
    InvalidId {
        resource: String,
        id: String,
        reason: String,
    },

    /// A resource that was just written could not be read back
    #[error("{resource} '{id}' disappeared right after it was written")]
    Gone { resource: String, id: String },
}

impl ProviderError {
    /// Wrap an id parse failure with the resource it belongs to
    pub(crate) fn invalid_id(resource: &str, err: CoreError) -> Self {
        match err {
            CoreError::InvalidId { id, reason } => ProviderError::InvalidId {
                resource: resource.to_string(),
                id,
                reason,
            },
            other => ProviderError::Core(other),
        }
    }

    pub(crate) fn replacement(resource: &str, field: &str) -> Self {
        ProviderError::RequiresReplacement {
            resource: resource.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn gone(resource: &str, id: impl ToString) -> Self {
        ProviderError::Gone {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Check if this error means the remote object is missing
    pub fn is_not_found(&self) -> bool {
        match self {
            ProviderError::Api(e) => e.is_not_found(),
            ProviderError::UserNotFound { .. } | ProviderError::Gone { .. } => true,
            _ => false,
        }
    }
}

impl From<CoreError> for ProviderError {
    fn from(err: CoreError) -> Self {
        ProviderError::Core(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_not_found_message() {
        let err = ProviderError::UserNotFound {
            email: "ghost@example.com".to_string(),
        };
        assert_eq!(err.to_string(), "User not found: ghost@example.com");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_id_keeps_reason() {
        let err = ProviderError::invalid_id(
            "buddy_project_member",
            CoreError::InvalidId {
                id: "web".to_string(),
                reason: "expected <project>:<member_id>".to_string(),
            },
        );
        assert!(matches!(err, ProviderError::InvalidId { .. }));
        assert!(err.to_string().contains("buddy_project_member"));
        assert!(err.to_string().contains("expected <project>:<member_id>"));
    }

    #[test]
    fn test_api_error_is_transparent() {
        let err: ProviderError = ApiError::UnexpectedStatus {
            expected: 200,
            status: 404,
            body: "gone".to_string(),
        }
        .into();
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("Expected return code is 200"));
    }
}

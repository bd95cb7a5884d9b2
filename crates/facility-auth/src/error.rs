//! Error types for authorization operations
//!
//! The decision core itself never fails: unknown input degrades to a denial.
//! These errors are for callers that escalate a denial into a failure and
//! for the secure-room scan flow, which talks to external collaborators.

use thiserror::Error;

use crate::config::ConfigError;

/// Authorization error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The actor may not perform the operation
    #[error("Forbidden: cannot {verb} {resource}")]
    Forbidden {
        /// Requested verb
        verb: String,
        /// Requested resource
        resource: String,
    },

    /// A record required for the decision does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Device credentials were missing or wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failure in an external collaborator
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authorization operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Denials and bad credentials are expected and are not server errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Internal(_) | AuthError::ConfigError(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Forbidden { .. } => 403,
            AuthError::NotFound(_) => 404,
            AuthError::InvalidCredentials => 401,
            AuthError::ConfigError(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Forbidden { .. } => "FORBIDDEN",
            AuthError::NotFound(_) => "NOT_FOUND",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ConfigError> for AuthError {
    fn from(err: ConfigError) -> Self {
        AuthError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_message_and_status() {
        let err = AuthError::Forbidden {
            verb: "show_problems".to_string(),
            resource: "order".to_string(),
        };
        assert_eq!(err.to_string(), "Forbidden: cannot show_problems order");
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_config_error_is_server_error() {
        let err: AuthError = ConfigError::MissingEnvVar("SECURE_ROOMS_API_BASIC_AUTH_NAME".to_string()).into();
        assert!(err.is_server_error());
        assert_eq!(err.status_code(), 500);
    }
}

//! Unified error handling for provisionctl-core
//!
//! Every failure from the provisioner or the remote client surfaces as a
//! [`CoreError`]. Provider faults keep the provider's code and message as-is.
//!
//! # Example
//!
//! ```rust
//! use provisionctl_core::CoreError;
//!
//! let err = CoreError::AlreadyExists {
//!     name: "MyTestTable".to_string(),
//! };
//! assert!(err.is_conflict());
//! assert!(!err.is_retryable());
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// Core error type for provisioning and remote service calls
#[derive(Error, Debug)]
pub enum CoreError {
    /// The resource spec (or request) was rejected before or by the service
    #[error("Invalid resource spec: {0}")]
    InvalidSpec(String),

    /// The service already has a resource with this name
    #[error("Resource '{name}' already exists")]
    AlreadyExists { name: String },

    /// The resource reached a failed terminal state while waiting
    #[error("Provisioning of '{name}' failed: {reason}")]
    ProvisioningFailed { name: String, reason: String },

    /// The resource did not become ready in time
    #[error("Timed out after {timeout:?} waiting for '{name}' to become ready")]
    Timeout { name: String, timeout: Duration },

    /// The wait was cancelled by the caller
    #[error("Wait for '{name}' was cancelled")]
    Cancelled { name: String },

    /// Any other fault reported by the provider, passed through unmodified
    #[error("Remote service error ({code}): {message}")]
    Remote { code: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpec(msg.into())
    }

    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Provider error code, if this error came from the remote service
    #[must_use]
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            CoreError::Remote { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Returns true if the resource already exists (409-style conflict)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, CoreError::AlreadyExists { .. })
    }

    /// Returns true if this is a timeout, either ours or the provider's
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::Timeout { .. } => true,
            CoreError::Remote { code, .. } => code == "TimeoutError",
            _ => false,
        }
    }

    /// Returns true if the request itself was malformed
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        match self {
            CoreError::InvalidSpec(_) => true,
            CoreError::Remote { code, .. } => code == "ValidationException",
            _ => false,
        }
    }

    /// Returns true if this error is potentially retryable by the caller
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Timeout { .. } => true,
            CoreError::Remote { code, .. } => matches!(
                code.as_str(),
                "TimeoutError"
                    | "DispatchFailure"
                    | "ThrottlingException"
                    | "ProvisionedThroughputExceededException"
                    | "RequestLimitExceeded"
                    | "LimitExceededException"
                    | "InternalServerError"
                    | "SlowDown"
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_exists_is_conflict() {
        let err = CoreError::AlreadyExists {
            name: "MyTestTable".to_string(),
        };
        assert!(err.is_conflict());
        assert!(!err.is_timeout());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("MyTestTable"));
    }

    #[test]
    fn test_timeout_helpers() {
        let err = CoreError::Timeout {
            name: "t".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(err.is_timeout());
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Timed out"));

        let sdk_timeout = CoreError::remote("TimeoutError", "operation timed out");
        assert!(sdk_timeout.is_timeout());
        assert!(sdk_timeout.is_retryable());
    }

    #[test]
    fn test_remote_error_keeps_provider_fields() {
        let err = CoreError::remote("AccessDeniedException", "User is not authorized");
        assert_eq!(err.remote_code(), Some("AccessDeniedException"));
        assert_eq!(
            err.to_string(),
            "Remote service error (AccessDeniedException): User is not authorized"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_bad_request_helpers() {
        assert!(CoreError::invalid_spec("missing partition key").is_bad_request());
        assert!(CoreError::remote("ValidationException", "bad item").is_bad_request());
        assert!(!CoreError::remote("ThrottlingException", "slow down").is_bad_request());
        assert!(CoreError::remote("ThrottlingException", "slow down").is_retryable());
    }

    #[test]
    fn test_non_remote_has_no_code() {
        let err = CoreError::Cancelled {
            name: "t".to_string(),
        };
        assert_eq!(err.remote_code(), None);
        assert!(!err.is_retryable());
    }
}

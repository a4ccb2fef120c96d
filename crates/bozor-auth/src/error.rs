//! Session and authorization error types.
//!
//! Every variant here is eventually collapsed by the gate into a single
//! deny-and-redirect outcome. The distinction only matters for diagnostics
//! and for callers that use the store or API client directly.

use std::fmt;

/// Errors that can occur while resolving a session's authorization.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The access or refresh token is absent from the session store.
    #[error("Missing credentials: {key}")]
    MissingCredentials {
        /// The storage key that had no value.
        key: String,
    },

    /// The access token failed local validation before any network call.
    #[error("Invalid access token: {message}")]
    InvalidAccessToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The refresh endpoint rejected the refresh token.
    #[error("Refresh rejected: {message}")]
    RefreshRejected {
        /// Description of the rejection.
        message: String,
    },

    /// The authorization status endpoint failed, timed out, or returned
    /// a body that does not match the expected schema.
    #[error("Status query failed: {message}")]
    StatusQueryFailed {
        /// Description of the failure.
        message: String,
    },

    /// An error occurred while reading or writing the session store.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The gate configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// Anything else that went wrong during evaluation.
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Description of the error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `MissingCredentials` error.
    #[must_use]
    pub fn missing_credentials(key: impl Into<String>) -> Self {
        Self::MissingCredentials { key: key.into() }
    }

    /// Creates a new `InvalidAccessToken` error.
    #[must_use]
    pub fn invalid_access_token(message: impl Into<String>) -> Self {
        Self::InvalidAccessToken {
            message: message.into(),
        }
    }

    /// Creates a new `RefreshRejected` error.
    #[must_use]
    pub fn refresh_rejected(message: impl Into<String>) -> Self {
        Self::RefreshRejected {
            message: message.into(),
        }
    }

    /// Creates a new `StatusQueryFailed` error.
    #[must_use]
    pub fn status_query_failed(message: impl Into<String>) -> Self {
        Self::StatusQueryFailed {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Unexpected` error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredentials { .. } | Self::InvalidAccessToken { .. } => {
                ErrorCategory::Credentials
            }
            Self::RefreshRejected { .. } | Self::StatusQueryFailed { .. } => {
                ErrorCategory::Remote
            }
            Self::Storage { .. } => ErrorCategory::Storage,
            Self::Configuration { .. } | Self::Unexpected { .. } => ErrorCategory::Internal,
        }
    }
}

/// Coarse classification of [`AuthError`] values, used for log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Local credentials are absent or unusable.
    Credentials,
    /// The backend refused or failed a request.
    Remote,
    /// The session store failed.
    Storage,
    /// Configuration problems and unexpected failures.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credentials => write!(f, "credentials"),
            Self::Remote => write!(f, "remote"),
            Self::Storage => write!(f, "storage"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::missing_credentials("refresh");
        assert_eq!(err.to_string(), "Missing credentials: refresh");

        let err = AuthError::refresh_rejected("HTTP 401");
        assert_eq!(err.to_string(), "Refresh rejected: HTTP 401");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::invalid_access_token("expired").category(),
            ErrorCategory::Credentials
        );
        assert_eq!(
            AuthError::status_query_failed("timeout").category(),
            ErrorCategory::Remote
        );
        assert_eq!(AuthError::storage("io").category(), ErrorCategory::Storage);
        assert_eq!(
            AuthError::unexpected("boom").category(),
            ErrorCategory::Internal
        );
        assert_eq!(ErrorCategory::Remote.to_string(), "remote");
    }
}

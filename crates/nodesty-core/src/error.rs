//! Error types for Nodesty client setup and envelope conversion.
//!
//! The transport itself never returns these: every call outcome is an
//! [`ApiResponse`](crate::ApiResponse). This type covers the things that can go
//! wrong before a call exists (configuration, identifiers, endpoints) and the
//! conversion of a failure envelope into a `Result` for callers who prefer `?`.

use crate::response::FailureKind;
use thiserror::Error;

/// Main error type for Nodesty client operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Invalid resource identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A call completed with a failure envelope
    #[error("{error}: {message}")]
    Api {
        /// Failure classification
        kind: FailureKind,
        /// Short error label (server message or classification)
        error: String,
        /// Longer human-readable message
        message: String,
    },
}

/// Specialized result type for Nodesty operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidId(_) => "INVALID_ID",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Api { kind, .. } => kind.code(),
        }
    }

    /// Returns true if retrying the same call could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api { kind, .. } if kind.is_retryable())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

//! Error types for search-service operations.

use thiserror::Error;

/// Search client error type.
///
/// Service-side failures carry the HTTP status, the service's error type
/// (e.g. `index_not_found_exception`) and its reason verbatim.
#[derive(Error, Debug)]
pub enum SearchError {
    /// No endpoint could be reached, or the connection settings are malformed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// An in-flight request failed below HTTP.
    #[error("Transport error: {0}")]
    Transport(#[from] opensearch::Error),

    /// The per-call deadline expired before the service answered.
    #[error("Operation timed out")]
    Timeout,

    /// Rejected locally (`status` is `None`) or by the service with HTTP 400.
    #[error("Validation error: {reason}")]
    Validation {
        /// HTTP status when the service rejected the request.
        status: Option<u16>,
        /// Why the request was rejected.
        reason: String,
    },

    /// The target already exists or a version check failed.
    #[error("Conflict ({status}, {error_type}): {reason}")]
    Conflict {
        /// HTTP status.
        status: u16,
        /// Service error type.
        error_type: String,
        /// Service reason.
        reason: String,
    },

    /// The index or document does not exist.
    #[error("Not found ({status}, {error_type}): {reason}")]
    NotFound {
        /// HTTP status.
        status: u16,
        /// Service error type.
        error_type: String,
        /// Service reason.
        reason: String,
    },

    /// Any other non-success answer.
    #[error("Service error ({status}, {error_type}): {reason}")]
    Service {
        /// HTTP status.
        status: u16,
        /// Service error type.
        error_type: String,
        /// Service reason.
        reason: String,
    },

    /// Request encoding or response decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// Local validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        SearchError::Validation {
            status: None,
            reason: reason.into(),
        }
    }

    /// HTTP status reported by the service, if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SearchError::Validation { status, .. } => *status,
            SearchError::Conflict { status, .. }
            | SearchError::NotFound { status, .. }
            | SearchError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Service error type, if the error came from a response.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            SearchError::Conflict { error_type, .. }
            | SearchError::NotFound { error_type, .. }
            | SearchError::Service { error_type, .. } => Some(error_type),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SearchError::Conflict { .. })
    }

    /// True for failures that never reached the service.
    pub fn is_connection(&self) -> bool {
        matches!(self, SearchError::Connection(_) | SearchError::Transport(_))
    }
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

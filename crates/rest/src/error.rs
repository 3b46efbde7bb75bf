//! Error types for the HTTP API.
//!
//! Every error renders as a JSON body of the form
//!
//! ```json
//! {"error": {"code": "invalid", "detail": "...", "fields": {"status": ["..."]}}}
//! ```
//!
//! where `fields` is present only for filter validation failures.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rackline_filters::{FieldErrors, ResolveError};
use rackline_persistence::error::StorageError;
use tracing::error;

/// Result type alias for handlers.
pub type RestResult<T> = Result<T, RestError>;

/// Errors returned by the HTTP API.
#[derive(Debug)]
pub enum RestError {
    /// Unknown resource type, field, or record (HTTP 404).
    NotFound {
        /// What was looked up.
        message: String,
    },

    /// Malformed request (HTTP 400).
    BadRequest {
        /// Description of the problem.
        message: String,
    },

    /// Filter values failed validation (HTTP 400).
    InvalidFilters {
        /// Messages keyed by parameter name.
        fields: FieldErrors,
    },

    /// The operation is not available for the target (HTTP 400).
    NotSupported {
        /// Description of the unsupported operation.
        message: String,
    },

    /// A single-record lookup matched several records (HTTP 412).
    MultipleMatches {
        /// Resource type searched.
        resource_type: String,
        /// The criteria that matched.
        criteria: String,
    },

    /// The store failed (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } | RestError::InvalidFilters { .. } | RestError::NotSupported { .. } => {
                StatusCode::BAD_REQUEST
            }
            RestError::MultipleMatches { .. } => StatusCode::PRECONDITION_FAILED,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::NotFound { .. } => "not-found",
            RestError::BadRequest { .. } | RestError::InvalidFilters { .. } => "invalid",
            RestError::NotSupported { .. } => "not-supported",
            RestError::MultipleMatches { .. } => "multiple-matches",
            RestError::InternalError { .. } => "exception",
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { message } => write!(f, "Not found: {}", message),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::InvalidFilters { fields } => write!(f, "Invalid filters: {}", fields),
            RestError::NotSupported { message } => write!(f, "Not supported: {}", message),
            RestError::MultipleMatches {
                resource_type,
                criteria,
            } => {
                write!(f, "Multiple {} records match {}", resource_type, criteria)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({
            "code": self.code(),
            "detail": self.to_string(),
        });
        if let RestError::InvalidFilters { fields } = &self {
            body["fields"] = serde_json::to_value(fields).unwrap_or_default();
        }
        (status, Json(serde_json::json!({ "error": body }))).into_response()
    }
}

impl From<ResolveError> for RestError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnknownResourceType { .. } | ResolveError::UnknownField { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            ResolveError::NotFound { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            ResolveError::NotAChoiceField { .. } => RestError::NotSupported {
                message: err.to_string(),
            },
            ResolveError::InvalidFilters(fields) => RestError::InvalidFilters { fields },
            ResolveError::InvalidOrdering(_) => RestError::BadRequest {
                message: err.to_string(),
            },
            ResolveError::AmbiguousResult {
                resource_type,
                criteria,
            } => RestError::MultipleMatches {
                resource_type,
                criteria,
            },
            ResolveError::Storage(storage) => storage.into(),
        }
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Query(query) => RestError::BadRequest {
                message: query.to_string(),
            },
            StorageError::Backend(backend) => {
                error!(error = %backend, "Store failure");
                RestError::InternalError {
                    message: backend.to_string(),
                }
            }
        }
    }
}

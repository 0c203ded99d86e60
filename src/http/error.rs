//! JSON error responses.

use crate::application::{
    ports::ResumeStoreError,
    services::{LifecycleError, ReviewError},
};
use crate::audit::AuditError;
use crate::error::ErrorKind;
use crate::identity::ports::IdentityError;
use crate::job::services::JobCatalogError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

/// Error returned by handlers, rendered as `{error, message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a 400 validation error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::Validation, message)
    }

    /// Creates a 403 error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::Authorization, message)
    }

    /// Creates a 404 error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::NotFound, message)
    }

    /// Creates a 401 error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthenticated", message)
    }

    /// Creates an error from a failure classification, using the class as
    /// the code.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::classified(kind, kind.as_str(), message)
    }

    /// Creates an error whose status follows `kind` and whose code names the
    /// specific failure.
    ///
    /// Invariant violations and internal failures are logged at error level.
    pub fn classified(kind: ErrorKind, code: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        if matches!(kind, ErrorKind::InvariantViolation | ErrorKind::Internal) {
            error!(kind = %kind, code, message = %message, "request failed");
        }
        Self::new(status_for(kind), code, message)
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::StateConflict | ErrorKind::GatewayDeclined => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::GatewayUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::InvariantViolation | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        Self::classified(err.kind(), err.code(), err.to_string())
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        let kind = err.kind();
        let message = match &err {
            ReviewError::Unauthorized { .. } | ReviewError::NotFound(_) => {
                "application not found or unauthorized".to_owned()
            }
            ReviewError::JobNotFound(_) => "job not found or unauthorized".to_owned(),
            _ => err.to_string(),
        };
        Self::classified(kind, err.code(), message)
    }
}

impl From<JobCatalogError> for ApiError {
    fn from(err: JobCatalogError) -> Self {
        Self::classified(err.kind(), err.code(), err.to_string())
    }
}

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        Self::classified(err.kind(), err.code(), err.to_string())
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Issuance(_) => Self::from_kind(ErrorKind::Internal, err.to_string()),
            _ => Self::unauthenticated(err.to_string()),
        }
    }
}

impl From<ResumeStoreError> for ApiError {
    fn from(err: ResumeStoreError) -> Self {
        match err {
            ResumeStoreError::Empty => Self::bad_request(err.to_string()),
            ResumeStoreError::TooLarge { .. } => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", err.to_string())
            }
            ResumeStoreError::Storage(_) => Self::from_kind(ErrorKind::Internal, err.to_string()),
        }
    }
}

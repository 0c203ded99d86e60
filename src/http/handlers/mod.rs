//! Request handlers grouped by resource.

pub(super) mod admin;
pub(super) mod applications;
pub(super) mod health;
pub(super) mod jobs;

use super::error::ApiError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use uuid::Uuid;

/// Parses a path segment as a UUID-backed identifier.
fn parse_id<T>(raw: &str, label: &str, wrap: fn(Uuid) -> T) -> Result<T, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(wrap)
        .map_err(|_| ApiError::bad_request(format!("invalid {label}: {raw}")))
}

/// Unwraps a JSON body, turning extractor rejections into JSON errors.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

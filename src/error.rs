//! Error types for the user service
//!
//! Each layer owns its error enum. Only `ApiError` ever reaches a client;
//! `CacheError` is logged and absorbed by the coordinator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

pub const USER_NOT_FOUND: &str = "User not found";

// == Store Error Enum ==
/// Failures reported by a `UserStore` backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No user with the given id
    #[error("User {0} not found")]
    NotFound(i64),

    /// Email uniqueness would be violated
    #[error("{0}")]
    Conflict(String),

    /// Anything the backend itself reports (connectivity, unexpected constraints)
    #[error("Database error: {0}")]
    Backend(#[from] sqlx::Error),
}

// == Cache Error Enum ==
/// Failures reported by a `CacheLayer` backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache process could not be reached or rejected the command
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// The cache refused the entry (oversized key or value)
    #[error("Cache rejected entry: {0}")]
    Rejected(String),
}

// == API Error Enum ==
/// Error type surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request data
    #[error("{0}")]
    Validation(String),

    /// Duplicate email
    #[error("{0}")]
    Conflict(String),

    /// Unknown user id
    #[error("{0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(USER_NOT_FOUND.to_string()),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Backend(e) => {
                error!("Store failure: {}", e);
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers and the coordinator.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let response = ApiError::from(StoreError::NotFound(7)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_keeps_message() {
        let err = ApiError::from(StoreError::Conflict("Email already in use".into()));
        assert_eq!(err.to_string(), "Email already in use");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backend_error_is_internal() {
        let err = ApiError::from(StoreError::Backend(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response = ApiError::Validation("Name is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::StoreError;
use serde_json::json;
use thiserror::Error;

use crate::jwt::AuthError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, invalid or expired token
    #[error("Unauthorized Access")]
    Unauthorized,

    /// Authenticated, but not the owner of the requested records
    #[error("Forbidden Access")]
    Forbidden,

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Document store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing | AuthError::Invalid | AuthError::Expired => ApiError::Unauthorized,
            AuthError::Signing(e) => {
                tracing::error!("Failed to sign token: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized Access".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden Access".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Store(err) => match err {
                StoreError::InvalidId(id) => {
                    (StatusCode::BAD_REQUEST, format!("Invalid id: {}", id))
                }
                StoreError::NotFound => (StatusCode::NOT_FOUND, "Document not found".to_string()),
                StoreError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
                StoreError::Conflict(msg) => (StatusCode::CONFLICT, msg),
                // Logged where the driver error is classified
                StoreError::Unavailable(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database unavailable".to_string(),
                ),
                StoreError::Conversion(e) => {
                    tracing::error!("Document conversion failed: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
                StoreError::Configuration(e) => {
                    tracing::error!("Document store misconfigured: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

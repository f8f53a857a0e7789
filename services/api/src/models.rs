//! API models for request and response payloads

use axum::extract::FromRequest;
use serde::Serialize;

use crate::error::ApiError;

pub mod food;
pub mod order;

/// JSON request body whose rejections use the API error format
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Acknowledgement for cookie operations
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: bool,
}

/// Response for `GET /foodsCount`
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Response for `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub database: bool,
}

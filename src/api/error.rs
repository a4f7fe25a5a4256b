//--------------------------------------------------------------------------------------------------
// ENUMS
//--------------------------------------------------------------------------------------------------
// | Name     | Description                                  | Key Methods         |
// |----------|----------------------------------------------|---------------------|
// | ApiError | Error surface of the HTTP transport          | into_response, from |
//--------------------------------------------------------------------------------------------------

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::engine::EngineError;

/// Type alias for Result with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

/// Transport-level error types. Every variant renders as a JSON body with a
/// single `detail` field.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// The request was malformed.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::OrderNotFound => Self::NotFound("Order not found".to_string()),
            EngineError::InvalidOrder(msg) => Self::BadRequest(msg),
        }
    }
}

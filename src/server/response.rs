use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::Error;

/// API error response. Serializes to `{"error": "..."}` with the given
/// status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Maps store failures to API responses. Database details are logged, never
/// sent to the client.
pub trait StoreResultExt<T> {
    fn api_err(self) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for Result<T, Error> {
    fn api_err(self) -> Result<T, ApiError> {
        self.map_err(|e| match e {
            Error::NotFound => ApiError::not_found("Not found"),
            Error::AlreadyExists => ApiError::conflict("Already exists"),
            other => {
                tracing::error!("Store operation failed: {other}");
                ApiError::internal()
            }
        })
    }
}

pub trait StoreOptionExt<T> {
    fn or_not_found(self, what: &str) -> Result<T, ApiError>;
}

impl<T> StoreOptionExt<T> for Option<T> {
    fn or_not_found(self, what: &str) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::not_found(format!("{what} not found")))
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::auth_service::AuthError;
use crate::services::photo_service::PhotoError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    /// 401 with an empty body, so a rejected credential and a rejected token
    /// are indistinguishable to the caller.
    Unauthorized,

    UsernameTaken,

    UploadFailed(String),

    PersistFailed,

    ValidationError(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::UsernameTaken => write!(f, "Username already exists!"),
            ApiError::UploadFailed(msg) => write!(f, "Upload failed: {}", msg),
            ApiError::PersistFailed => write!(f, "Could not add the photo"),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Unauthorized => {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            ApiError::UsernameTaken => {
                (StatusCode::BAD_REQUEST, "Username already exists!".to_string())
            }
            ApiError::UploadFailed(msg) => {
                tracing::warn!("Image host error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Image host is unavailable".to_string(),
                )
            }
            ApiError::PersistFailed => {
                (StatusCode::BAD_REQUEST, "Could not add the photo".to_string())
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UsernameTaken => ApiError::UsernameTaken,
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<PhotoError> for ApiError {
    fn from(err: PhotoError) -> Self {
        match err {
            PhotoError::Forbidden => ApiError::Unauthorized,
            PhotoError::UserNotFound(id) => ApiError::not_found("User", id),
            PhotoError::Upload(msg) => ApiError::UploadFailed(msg),
            PhotoError::Persist => ApiError::PersistFailed,
            PhotoError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

use crate::domain::user::ValidationError;
use crate::storage::user_repo::CreateUserError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub const BAD_REQUEST_REASON: &str = "bad request";
pub const DUPLICATE_USERNAME_REASON: &str = "username already exists";
pub const INTERNAL_ERROR_REASON: &str = "internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<CreateUserError> for AppError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::DuplicateUsername => Self::BadRequest(DUPLICATE_USERNAME_REASON.to_string()),
            CreateUserError::Database(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, reason) = match self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_REASON.to_string())
            }
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
        };

        let body = Json(json!({
            "reason": reason
        }));

        (status, body).into_response()
    }
}

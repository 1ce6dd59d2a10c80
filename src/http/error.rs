//! Handler error type.
//!
//! Handlers return `Result<ApiResponse<T>, AppError>`; this is the one place
//! where a failure becomes an error envelope.

use axum::extract::rejection::QueryRejection;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::{
    ApiResponse, BAD_REQUEST_CODE, FORBIDDEN_CODE, METHOD_NOT_ALLOWED_CODE, NOT_FOUND_CODE,
    SERVER_ERROR_CODE, SERVER_ERROR_MESSAGE, UNAUTHORIZED_CODE,
};

pub type AppResult<T> = Result<ApiResponse<T>, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Envelope code for this error.
    pub fn code(&self) -> i32 {
        match self {
            AppError::BadRequest(_) => BAD_REQUEST_CODE,
            AppError::Unauthorized(_) => UNAUTHORIZED_CODE,
            AppError::Forbidden(_) => FORBIDDEN_CODE,
            AppError::NotFound(_) => NOT_FOUND_CODE,
            AppError::MethodNotAllowed(_) => METHOD_NOT_ALLOWED_CODE,
            AppError::Internal(_) => SERVER_ERROR_CODE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                SERVER_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        ApiResponse::error(self.code(), message).into_response()
    }
}

/// Malformed query strings surface as a 400 envelope instead of axum's plain-text rejection.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

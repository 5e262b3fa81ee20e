use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Failure taxonomy shared by the auth layer and both registries.
///
/// Authorization failures, not-found failures and validation failures stay
/// distinct all the way to the HTTP boundary; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} not found or already inactive")]
    NotFoundOrInactive(&'static str),

    #[error("{0} not updated")]
    UpdateFailed(&'static str),

    #[error("{0} not created")]
    CreateFailed(&'static str),

    #[error("Registration failed")]
    RegistrationFailed,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::NotFound(_) | AppError::NotFoundOrInactive(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::UpdateFailed(_)
            | AppError::CreateFailed(_)
            | AppError::RegistrationFailed
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let message = if status.is_server_error() {
            // Internal detail stays in the logs.
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

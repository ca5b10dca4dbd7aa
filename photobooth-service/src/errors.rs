use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common_auth::GuardError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Domain errors translated at the boundary into the response taxonomy.
/// Internal detail stays in the Display impl for logs and never reaches the
/// caller on 5xx responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed on '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("pairing failed")]
    PairingFailed,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("failed to generate token: {0}")]
    TokenGeneration(#[source] anyhow::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("internal error: {0}")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<GuardError> for ApiError {
    fn from(value: GuardError) -> Self {
        let (_, message) = value.into_response();
        Self::Forbidden(message)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION",
                    message: "request validation failed".to_string(),
                    errors: Some(serde_json::json!({ field: message })),
                },
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid credentials. Please try again.".to_string(),
                    errors: None,
                },
            ),
            // Device-not-found and secret-mismatch collapse into one message
            // so device codes cannot be enumerated.
            ApiError::PairingFailed => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "PAIRING_FAILED",
                    message: "pairing failed".to_string(),
                    errors: None,
                },
            ),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "FORBIDDEN",
                    message,
                    errors: None,
                },
            ),
            ApiError::TokenGeneration(err) => {
                error!(error = %err, "token generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "SERVER_ERROR",
                        message: "internal server error".to_string(),
                        errors: None,
                    },
                )
            }
            ApiError::Database(err) => {
                error!(error = %err, "database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "SERVER_ERROR",
                        message: "internal server error".to_string(),
                        errors: None,
                    },
                )
            }
            ApiError::Internal(err) => {
                error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "SERVER_ERROR",
                        message: "internal server error".to_string(),
                        errors: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Login refused. Same body as `AuthenticationError`, answered as a bad request.
    #[error("Authentication error: {0}")]
    InvalidCredentials(String),

    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidCredentials(_)
            | AppError::Conflict(_)
            | AppError::StateError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfigurationError(_)
            | AppError::DatabaseError(_)
            | AppError::SerializationError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthenticationError(_) | AppError::InvalidCredentials(_) => {
                "AUTHENTICATION_ERROR"
            }
            AppError::AuthorizationError(_) => "AUTHORIZATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::StateError(_) => "STATE_ERROR",
            AppError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::SerializationError(_) => "SERIALIZATION_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.kind().to_string();

        let (message, details) = match self {
            AppError::ValidationError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::InvalidCredentials(msg)
            | AppError::AuthorizationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::StateError(msg) => (msg, None),
            AppError::ConfigurationError(msg) => {
                tracing::error!("Configuration error: {msg}");
                ("Server misconfigured".to_string(), Some(msg))
            }
            AppError::DatabaseError(err) => {
                tracing::error!("Database error: {err}");
                ("Database operation failed".to_string(), Some(err.to_string()))
            }
            AppError::SerializationError(msg) => {
                tracing::error!("Serialization error: {msg}");
                ("Data serialization failed".to_string(), Some(msg))
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {msg}");
                ("An internal error occurred".to_string(), Some(msg))
            }
        };

        let error_response = ErrorResponse {
            error,
            message,
            details,
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<bson::ser::Error> for AppError {
    fn from(err: bson::ser::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<bson::de::Error> for AppError {
    fn from(err: bson::de::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalError(format!("Password hashing failed: {err}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Background task failed: {err}"))
    }
}

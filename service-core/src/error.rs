use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    /// A call to an upstream service failed. Rendered as a 500 carrying a
    /// fixed, operation-specific message and the underlying error text.
    #[error("{message}: {details}")]
    Upstream {
        message: String,
        details: String,
        /// Adds `"success": false` to the envelope for endpoints whose
        /// callers branch on that flag.
        report_success: bool,
    },

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn upstream(message: impl Into<String>, details: impl ToString) -> Self {
        AppError::Upstream {
            message: message.into(),
            details: details.to_string(),
            report_success: false,
        }
    }

    pub fn upstream_check(message: impl Into<String>, details: impl ToString) -> Self {
        AppError::Upstream {
            message: message.into(),
            details: details.to_string(),
            report_success: true,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, success, error_message, details) = match self {
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, None, err.to_string(), None),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, None, err.to_string(), None),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                "Internal server error".to_string(),
                Some(format!("{:#}", err)),
            ),
            AppError::Upstream {
                message,
                details,
                report_success,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                report_success.then_some(false),
                message,
                Some(details),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                "Configuration error".to_string(),
                Some(err.to_string()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                success,
                error: error_message,
                details,
            }),
        )
            .into_response()
    }
}

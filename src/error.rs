use crate::validate::UrlError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Everything a handler can fail with. This is the only place where failures
/// become status codes and JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Failed to generate unique short code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: usize },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::CodeGenerationExhausted { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::CodeGenerationExhausted { .. } => {
                tracing::error!("{}", self);
                json!({ "error": "Failed to generate unique short code. Please try again." })
            }
            Self::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

//! API error types with HTTP mapping
//!
//! Provider error codes cross the wire verbatim; only the HTTP status is
//! decided here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use a2e_provider::ProviderError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors the HTTP surface can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A provider-engine rejection, carrying its stable code.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The request body or parameters could not be understood.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No such service is published.
    #[error("service '{0}' not found")]
    ServiceNotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// `{code, message}` error body, optionally with a remediation hint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ApiError {
    /// Stable wire code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Provider(err) => err.code(),
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ServiceNotFound(_) => "SERVICE_NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Provider(ProviderError::InvalidToken) => StatusCode::UNAUTHORIZED,
            ApiError::Provider(ProviderError::AccessDenied) => StatusCode::FORBIDDEN,
            ApiError::Provider(ProviderError::OrderNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Provider(ProviderError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Provider(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Don't expose internal detail to clients.
            ApiError::Internal(msg) | ApiError::Provider(ProviderError::Store(msg)) => {
                tracing::error!(error = %msg, "internal error");
                "an internal error occurred".to_string()
            }
            other => other.to_string(),
        };
        let suggestion = match &self {
            ApiError::Provider(err) => err.suggestion().map(str::to_string),
            _ => None,
        };

        let body = ErrorBody {
            code: self.code().to_string(),
            message,
            suggestion,
        };
        (status, Json(body)).into_response()
    }
}

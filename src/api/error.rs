//! Error handling for the webhook endpoint.
//!
//! Rejections are returned verbatim. Everything else is logged with its full
//! cause chain and surfaced as a bare 500 so no internals reach the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::github::DiffError;
use crate::push::{PushError, Rejection};

#[derive(Debug)]
pub enum ApiError {
    /// Client input that does not qualify for an email
    Rejected(Rejection),
    /// Anything unexpected: upstream fetch, SMTP, malformed payload
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(rejection) => {
                tracing::info!(
                    status = %rejection.status,
                    reason = %rejection.message,
                    "Push event rejected"
                );
                (rejection.status, rejection.message).into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "Failed to process push event");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Rejected(rejection) => {
                write!(f, "[{}] {}", rejection.status.as_u16(), rejection.message)
            }
            ApiError::Internal(err) => write!(f, "{:#}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

impl From<PushError> for ApiError {
    fn from(err: PushError) -> Self {
        match err {
            PushError::Rejected(rejection) => ApiError::Rejected(rejection),
            malformed @ PushError::Malformed(_) => ApiError::Internal(malformed.into()),
        }
    }
}

impl From<DiffError> for ApiError {
    fn from(err: DiffError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use shelf_types::ValidationError;

use crate::envelope::Envelope;

/// Errors raised while configuring or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A request that could not be served.
///
/// Each variant maps to one HTTP status and renders as the failure envelope
/// `{ "success": false, "error": "..." }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid JSON format: {0}")]
    InvalidJson(String),

    #[error("invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("id must be a number")]
    InvalidId(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found")]
    NotFound { kind: &'static str },

    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { method: String, path: String },

    /// The body could not be read, e.g. it exceeds the size limit.
    #[error("{reason}")]
    BodyRejected { status: StatusCode, reason: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The detail is logged, never sent to the client.
    #[error("internal server error")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(kind: &'static str) -> Self {
        Self::NotFound { kind }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_)
            | Self::InvalidQuery(_)
            | Self::InvalidId(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::BodyRejected { status, .. } => *status,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::BodyRejected {
            status: rejection.status(),
            reason: rejection.body_text(),
        }
    }
}

impl From<ServerError> for ApiError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::AuthFailed(reason) => Self::Unauthorized(reason),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(detail) => tracing::error!(%detail, "request failed"),
            Self::Unauthorized(reason) => tracing::warn!(%reason, "request rejected"),
            Self::InvalidId(raw) => tracing::debug!(raw = %raw, "malformed record id"),
            other => tracing::debug!(error = %other, "request rejected"),
        }
        let status = self.status();
        (status, Envelope::<()>::failure(self.to_string())).into_response()
    }
}

//! Request handlers.
//!
//! Handlers are stateless: each one authenticates the caller, validates its
//! input, makes exactly one store call and wraps the result in an
//! [`Envelope`](crate::envelope::Envelope).

pub mod books;
pub mod todos;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::{Method, Uri};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use shelf_types::RecordId;

use crate::error::ApiError;

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "shelf-server",
        "version": env!("CARGO_PKG_VERSION"),
        "resources": ["books", "todos"],
    }))
}

pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// The path exists but has no handler for this method.
pub async fn method_not_allowed_handler(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// The `{id}` path segment, parsed before any store access.
#[derive(Clone, Copy, Debug)]
pub struct RecordIdPath(pub RecordId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RecordIdPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, ApiError> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::InvalidId(e.body_text()))?;
        RecordId::parse(&raw)
            .map(Self)
            .map_err(|_| ApiError::InvalidId(raw))
    }
}

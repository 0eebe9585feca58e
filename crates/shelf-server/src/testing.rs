//! Helpers for driving the router in unit tests.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

use crate::config::{AuthConfig, ServerConfig};
use crate::router::build_router;
use crate::state::AppState;

pub(crate) fn seeded_app() -> Router {
    build_router(AppState::from_config(&ServerConfig::default()))
}

pub(crate) fn unseeded_app() -> Router {
    build_router(AppState::empty())
}

/// Two users, `alice-token` and `bob-token`, and no seed data.
pub(crate) fn token_app() -> Router {
    let config = ServerConfig {
        seed_demo_data: false,
        auth: AuthConfig {
            tokens: [("alice-token", "alice"), ("bob-token", "bob")]
                .into_iter()
                .map(|(t, u)| (t.to_string(), u.to_string()))
                .collect(),
        },
        ..Default::default()
    };
    build_router(AppState::from_config(&config))
}

pub(crate) async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_as(app, None, method, uri, body).await
}

pub(crate) async fn send_as(
    app: &Router,
    token: Option<&str>,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    dispatch(app, builder.body(body).unwrap()).await
}

pub(crate) async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    raw: impl Into<Body>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(raw.into())
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

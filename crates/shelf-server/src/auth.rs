use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use shelf_types::OwnerId;

use crate::config::AuthConfig;
use crate::error::{ApiError, ServerError, ServerResult};
use crate::state::AppState;

/// The caller a request is served for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub owner: OwnerId,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self { owner: OwnerId::anonymous() }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self { owner: OwnerId::new(name) }
    }

    pub fn is_anonymous(&self) -> bool {
        self.owner.is_anonymous()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read an `Authorization: Bearer <token>` header.
    ///
    /// Anything else, including other schemes, counts as anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self::Bearer(token.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

/// Resolves request credentials to an [`Identity`].
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;

    /// Short name for log lines.
    fn name(&self) -> &'static str;
}

/// Every caller is the anonymous owner. Used when no tokens are configured.
pub struct AnonymousAuth;

#[async_trait]
impl AuthProvider for AnonymousAuth {
    async fn authenticate(&self, _credentials: &Credentials) -> ServerResult<Identity> {
        Ok(Identity::anonymous())
    }

    fn name(&self) -> &'static str {
        "anonymous"
    }
}

/// Bearer tokens looked up in a fixed table.
pub struct StaticTokenAuth {
    tokens: HashMap<String, OwnerId>,
}

impl StaticTokenAuth {
    pub fn new<I, T, U>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
        T: Into<String>,
        U: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, user)| (token.into(), OwnerId::new(user)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::Bearer(token) => self
                .tokens
                .get(token)
                .map(|owner| Identity { owner: owner.clone() })
                .ok_or_else(|| ServerError::AuthFailed("invalid token".into())),
            Credentials::Anonymous => Err(ServerError::AuthFailed("missing bearer token".into())),
        }
    }

    fn name(&self) -> &'static str {
        "static-token"
    }
}

/// Pick the provider the configuration asks for.
pub fn provider_from_config(config: &AuthConfig) -> Arc<dyn AuthProvider> {
    if config.is_enabled() {
        Arc::new(StaticTokenAuth::new(config.tokens.clone()))
    } else {
        Arc::new(AnonymousAuth)
    }
}

/// Extractor for the authenticated caller.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn owner(&self) -> &OwnerId {
        &self.0.owner
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let credentials = Credentials::from_headers(&parts.headers);
        let identity = state.auth.authenticate(&credentials).await?;
        tracing::trace!(provider = state.auth.name(), owner = %identity.owner, "authenticated");
        Ok(Self(identity))
    }
}

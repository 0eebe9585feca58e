use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Load the demo books and tasks at startup, owned by the anonymous user.
    /// Ignored when `[auth] tokens` is set, since no token maps to that user.
    pub seed_demo_data: bool,
    /// Allow any origin, so a browser UI served elsewhere can call the API.
    pub cors_permissive: bool,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            seed_demo_data: true,
            cors_permissive: true,
            auth: AuthConfig::default(),
        }
    }
}

/// Bearer token table. Empty means every caller is anonymous.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// token -> user name
    pub tokens: BTreeMap<String, String>,
}

impl AuthConfig {
    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }
}

impl ServerConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> ServerResult<()> {
        for (token, user) in &self.auth.tokens {
            if token.trim().is_empty() {
                return Err(ServerError::Config("auth token must not be empty".into()));
            }
            if user.trim().is_empty() {
                return Err(ServerError::Config(format!(
                    "auth token {}... has no user name",
                    token.chars().take(4).collect::<String>()
                )));
            }
        }
        Ok(())
    }
}

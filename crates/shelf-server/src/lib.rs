//! HTTP server for shelf.
//!
//! Serves a book catalog and a todo list over a REST API. Every response
//! body is the same envelope, `{ success, data?, message?, meta?, error? }`,
//! and every record is scoped to the caller resolved by the configured
//! [`AuthProvider`].

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;
pub mod validation;

#[cfg(test)]
mod testing;

pub use auth::{AnonymousAuth, AuthProvider, Credentials, CurrentUser, Identity, StaticTokenAuth};
pub use config::{AuthConfig, ServerConfig};
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use router::{build_router, build_router_with_config, endpoints};
pub use server::ShelfServer;
pub use state::AppState;

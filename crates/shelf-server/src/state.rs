use std::sync::Arc;

use shelf_store::{demo_book_store, demo_task_store, InMemoryRecordStore, RecordStore};
use shelf_types::{Book, OwnerId, Task};

use crate::auth::{provider_from_config, AnonymousAuth, AuthProvider};
use crate::config::ServerConfig;

/// Everything a handler needs. Cloned per request; the stores are shared.
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<dyn RecordStore<Book>>,
    pub todos: Arc<dyn RecordStore<Task>>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(
        books: Arc<dyn RecordStore<Book>>,
        todos: Arc<dyn RecordStore<Task>>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self { books, todos, auth }
    }

    /// Empty stores, no authentication.
    pub fn empty() -> Self {
        Self::new(
            Arc::new(InMemoryRecordStore::<Book>::new()),
            Arc::new(InMemoryRecordStore::<Task>::new()),
            Arc::new(AnonymousAuth),
        )
    }

    /// Seeds only in anonymous mode: the demo records belong to the
    /// anonymous owner, which no bearer token resolves to.
    pub fn from_config(config: &ServerConfig) -> Self {
        let auth = provider_from_config(&config.auth);
        if config.seed_demo_data && config.auth.is_enabled() {
            tracing::warn!("token auth is enabled; skipping anonymous demo data");
        }
        if !config.seed_demo_data || config.auth.is_enabled() {
            return Self { auth, ..Self::empty() };
        }
        let owner = OwnerId::anonymous();
        Self::new(
            Arc::new(demo_book_store(&owner)),
            Arc::new(demo_task_store(&owner)),
            auth,
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth.name())
            .finish_non_exhaustive()
    }
}

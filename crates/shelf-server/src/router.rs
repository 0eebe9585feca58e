use std::any::Any;

use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handler::{self, books, todos};
use crate::state::AppState;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const INFO: &str = "/info";
    pub const BOOKS: &str = "/books";
    pub const BOOK_STATS: &str = "/books/stats";
    pub const BOOK: &str = "/books/:id";
    pub const TODOS: &str = "/todos";
    pub const TODO_STATS: &str = "/todos/stats";
    pub const TODO: &str = "/todos/:id";
}

/// Build the axum router with all shelf endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(
            endpoints::BOOKS,
            get(books::list_books).post(books::create_book),
        )
        .route(endpoints::BOOK_STATS, get(books::book_stats))
        .route(
            endpoints::BOOK,
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route(
            endpoints::TODOS,
            get(todos::list_todos).post(todos::create_todo),
        )
        .route(endpoints::TODO_STATS, get(todos::todo_stats))
        .route(
            endpoints::TODO,
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .fallback(handler::not_found_handler)
        .method_not_allowed_fallback(handler::method_not_allowed_handler)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// [`build_router`] plus the layers the config asks for.
pub fn build_router_with_config(state: AppState, config: &ServerConfig) -> Router {
    let router = build_router(state);
    if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(%detail, "handler panicked");
    ApiError::Internal(detail.to_string()).into_response()
}

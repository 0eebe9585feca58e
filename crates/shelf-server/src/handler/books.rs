use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use shelf_types::{Book, BookStats, BookStatus, Record};

use crate::auth::CurrentUser;
use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::handler::RecordIdPath;
use crate::state::AppState;
use crate::validation;

/// `GET /books` filters. All are optional and combine with AND.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BookQuery {
    /// Case-insensitive substring of title or author.
    pub q: Option<String>,
    /// Exact genre.
    pub genre: Option<String>,
    pub status: Option<String>,
}

struct BookFilter {
    needle: Option<String>,
    genre: Option<String>,
    status: Option<BookStatus>,
}

impl BookQuery {
    fn into_filter(self) -> ApiResult<BookFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(s) => Some(s.parse::<BookStatus>()?),
        };
        Ok(BookFilter {
            needle: self
                .q
                .map(|q| q.trim().to_lowercase())
                .filter(|q| !q.is_empty()),
            genre: self
                .genre
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty() && g != "all"),
            status,
        })
    }
}

impl BookFilter {
    fn matches(&self, book: &Book) -> bool {
        let text_ok = self.needle.as_ref().map_or(true, |n| {
            book.title.to_lowercase().contains(n) || book.author.to_lowercase().contains(n)
        });
        let genre_ok = self.genre.as_ref().map_or(true, |g| book.genre == *g);
        let status_ok = self.status.map_or(true, |s| book.status == s);
        text_ok && genre_ok && status_ok
    }
}

pub async fn list_books(
    State(state): State<AppState>,
    user: CurrentUser,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> ApiResult<Envelope<Vec<Book>>> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let filter = query.into_filter()?;
    let books: Vec<Book> = state
        .books
        .list_all(user.owner())
        .into_iter()
        .filter(|b| filter.matches(b))
        .collect();
    Ok(Envelope::ok(books).with_message("Books retrieved successfully"))
}

pub async fn create_book(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Envelope<Book>)> {
    let obj = validation::parse_object(&body?)?;
    let draft = validation::new_book(&obj)?;
    let book = state.books.create(user.owner(), draft);
    tracing::info!(id = %book.id, owner = %user.owner(), "book created");
    Ok((
        StatusCode::CREATED,
        Envelope::ok(book).with_message("Book created successfully"),
    ))
}

pub async fn get_book(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Envelope<Book>> {
    let book = state
        .books
        .get_by_id(user.owner(), id)
        .ok_or(ApiError::not_found(Book::KIND))?;
    Ok(Envelope::ok(book).with_message("Book retrieved successfully"))
}

pub async fn update_book(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordIdPath(id): RecordIdPath,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Envelope<Book>> {
    // An unknown id is 404 whatever the body holds.
    if state.books.get_by_id(user.owner(), id).is_none() {
        return Err(ApiError::not_found(Book::KIND));
    }
    let obj = validation::parse_object(&body?)?;
    let patch = validation::book_patch(&obj)?;
    let book = state
        .books
        .update(user.owner(), id, patch)
        .ok_or(ApiError::not_found(Book::KIND))?;
    tracing::info!(%id, owner = %user.owner(), "book updated");
    Ok(Envelope::ok(book).with_message("Book updated successfully"))
}

pub async fn delete_book(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Envelope<()>> {
    if !state.books.delete(user.owner(), id) {
        return Err(ApiError::not_found(Book::KIND));
    }
    tracing::info!(%id, owner = %user.owner(), "book deleted");
    Ok(Envelope::message_only("Book deleted successfully"))
}

pub async fn book_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Envelope<BookStats>> {
    let stats = state.books.stats(user.owner());
    Ok(Envelope::ok(stats).with_message("Statistics retrieved successfully"))
}

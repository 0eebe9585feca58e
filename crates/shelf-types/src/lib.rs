//! Foundation types for shelf.
//!
//! This crate provides the record kinds and supporting types shared by the
//! store and the HTTP layer. Every other shelf crate depends on `shelf-types`.
//!
//! # Key Types
//!
//! - [`RecordId`] -- Store-assigned, monotonically increasing identifier
//! - [`OwnerId`] -- Identity that scopes which records a caller can see
//! - [`Book`] / [`Task`] -- The two record kinds, with their drafts and patches
//! - [`Patch`] -- Tri-state field update (absent / null / value)
//! - [`Record`] -- The seam the generic store is written against
//! - [`MonotonicClock`] -- Timestamp source that never repeats or goes backwards

pub mod book;
pub mod error;
pub mod patch;
pub mod record;
pub mod task;
pub mod temporal;

pub use book::{Book, BookPatch, BookStats, BookStatus, NewBook, MAX_RATING, MIN_RATING};
pub use error::{TypeError, ValidationError};
pub use patch::Patch;
pub use record::{OwnerId, Record, RecordId};
pub use task::{
    NewTask, Task, TaskPatch, TaskStats, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};
pub use temporal::{Clock, FixedClock, MonotonicClock, SystemClock};

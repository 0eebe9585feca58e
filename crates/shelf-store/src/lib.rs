//! Record storage for shelf.
//!
//! A store owns every record of one kind for the lifetime of the process.
//! Records are kept in insertion order and keyed by a monotonically
//! increasing [`RecordId`](shelf_types::RecordId).
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`InMemoryRecordStore`] -- `Vec`-backed store behind a single `RwLock`
//!
//! # Design Rules
//!
//! 1. Ids are never reused, even after a delete.
//! 2. Every record belongs to exactly one owner and is invisible to others.
//! 3. Absence is a normal outcome (`None` / `false`), never an error.
//! 4. Stats are recomputed from current contents on every call.
//! 5. Nothing is persisted: dropping the store drops the data.

pub mod memory;
pub mod seed;
pub mod traits;

pub use memory::InMemoryRecordStore;
pub use seed::{demo_book_store, demo_books, demo_task_store, demo_tasks};
pub use traits::RecordStore;

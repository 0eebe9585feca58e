//! Demo datasets loaded at startup when seeding is enabled.

use shelf_types::{Book, BookStatus, NewBook, NewTask, OwnerId, Task};

use crate::memory::InMemoryRecordStore;

/// The three demo books.
pub fn demo_books() -> Vec<NewBook> {
    vec![
        NewBook::new("1984", "George Orwell", 1949, "Dystopia", 328, BookStatus::Completed)
            .with_rating(5)
            .with_notes("A chilling book about totalitarianism and control over the mind"),
        NewBook::new(
            "The Master and Margarita",
            "Mikhail Bulgakov",
            1967,
            "Fantasy",
            480,
            BookStatus::Completed,
        )
        .with_rating(5)
        .with_notes("A classic of Russian literature with a touch of mysticism"),
        NewBook::new("Clean Code", "Robert Martin", 2008, "Programming", 464, BookStatus::Reading)
            .with_notes("Worth finishing to sharpen programming skills"),
    ]
}

/// The two demo tasks.
pub fn demo_tasks() -> Vec<NewTask> {
    vec![
        NewTask::new("Learn REST APIs")
            .with_description("Understand how RESTful web services work")
            .with_completed(true),
        NewTask::new("Exercise the API from an HTTP client")
            .with_description("Build a collection of requests covering every endpoint"),
    ]
}

/// A book store holding [`demo_books`], owned by `owner`.
pub fn demo_book_store(owner: &OwnerId) -> InMemoryRecordStore<Book> {
    InMemoryRecordStore::with_seed(owner, demo_books())
}

/// A task store holding [`demo_tasks`], owned by `owner`.
pub fn demo_task_store(owner: &OwnerId) -> InMemoryRecordStore<Task> {
    InMemoryRecordStore::with_seed(owner, demo_tasks())
}

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::patch::Patch;
use crate::record::{Record, RecordId};

pub const MIN_RATING: u8 = 0;
pub const MAX_RATING: u8 = 5;

/// Reading progress of a book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Unread,
    Reading,
    Completed,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [Self::Unread, Self::Reading, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Reading => "reading",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for BookStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStatus {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A book in a personal collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub pages: u32,
    pub rating: u8,
    pub status: BookStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub pages: u32,
    pub rating: u8,
    pub status: BookStatus,
    pub notes: String,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        pages: u32,
        status: BookStatus,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            pages,
            rating: MIN_RATING,
            status,
            notes: String::new(),
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Validated partial update for a book.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Patch<String>,
    pub author: Patch<String>,
    pub year: Patch<i32>,
    pub genre: Patch<String>,
    pub pages: Patch<u32>,
    pub rating: Patch<u8>,
    pub status: Patch<BookStatus>,
    pub notes: Patch<String>,
}

impl BookPatch {
    /// Returns `true` if no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_absent()
            && self.author.is_absent()
            && self.year.is_absent()
            && self.genre.is_absent()
            && self.pages.is_absent()
            && self.rating.is_absent()
            && self.status.is_absent()
            && self.notes.is_absent()
    }
}

/// Derived counts over a book collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    pub total: usize,
    pub completed: usize,
    pub reading: usize,
    pub unread: usize,
    /// Number of distinct non-empty genres.
    pub genres: usize,
    /// Distinct non-empty genres in first-seen order.
    pub available_genres: Vec<String>,
}

impl Record for Book {
    type Draft = NewBook;
    type Patch = BookPatch;
    type Stats = BookStats;

    const KIND: &'static str = "book";

    fn from_draft(id: RecordId, draft: NewBook, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            year: draft.year,
            genre: draft.genre,
            pages: draft.pages,
            rating: draft.rating,
            status: draft.status,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn apply_patch(&mut self, patch: BookPatch, now: DateTime<Utc>) {
        patch.title.apply_required(&mut self.title);
        patch.author.apply_required(&mut self.author);
        patch.year.apply_required(&mut self.year);
        patch.genre.apply_required(&mut self.genre);
        patch.pages.apply_required(&mut self.pages);
        patch.status.apply_required(&mut self.status);
        patch.rating.apply_to(&mut self.rating, || MIN_RATING);
        patch.notes.apply_to(&mut self.notes, String::new);
        self.updated_at = now.max(self.created_at);
    }

    fn summarize<'a, I>(records: I) -> BookStats
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut stats = BookStats::default();
        let mut seen = HashSet::new();
        for book in records {
            stats.total += 1;
            match book.status {
                BookStatus::Completed => stats.completed += 1,
                BookStatus::Reading => stats.reading += 1,
                BookStatus::Unread => stats.unread += 1,
            }
            let genre = book.genre.trim();
            if !genre.is_empty() && seen.insert(genre) {
                stats.available_genres.push(genre.to_string());
            }
        }
        stats.genres = stats.available_genres.len();
        stats
    }
}

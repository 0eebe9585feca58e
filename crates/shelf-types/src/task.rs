use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patch::Patch;
use crate::record::{Record, RecordId};

/// Upper bound on a task title, in characters.
pub const TITLE_MAX_CHARS: usize = 200;
/// Upper bound on a task description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// A todo item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a task. Tasks start pending unless the
/// caller says otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            completed: false,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Validated partial update for a task.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub completed: Patch<bool>,
}

impl TaskPatch {
    /// Shorthand for a patch that only flips completion.
    pub fn completed(done: bool) -> Self {
        Self {
            completed: Patch::Value(done),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_absent() && self.description.is_absent() && self.completed.is_absent()
    }
}

/// Derived counts over a task collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    /// Percentage of completed tasks, rounded to the nearest integer.
    /// Zero for an empty collection.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

impl Record for Task {
    type Draft = NewTask;
    type Patch = TaskPatch;
    type Stats = TaskStats;

    const KIND: &'static str = "task";

    fn from_draft(id: RecordId, draft: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
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

    fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        patch.title.apply_required(&mut self.title);
        patch.description.apply_to(&mut self.description, String::new);
        patch.completed.apply_to(&mut self.completed, || false);
        self.updated_at = now.max(self.created_at);
    }

    fn summarize<'a, I>(records: I) -> TaskStats
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut stats = TaskStats::default();
        for task in records {
            stats.total += 1;
            if task.completed {
                stats.completed += 1;
            }
        }
        stats.pending = stats.total - stats.completed;
        stats
    }
}

//! Turns raw JSON bodies into validated drafts and patches.
//!
//! Every function either returns a fully-typed value or a single
//! [`ValidationError`]; nothing reaches the store until validation is done.

use serde_json::{Map, Value};

use shelf_types::{
    BookPatch, BookStatus, NewBook, NewTask, Patch, TaskPatch, ValidationError,
    DESCRIPTION_MAX_CHARS, MAX_RATING, MIN_RATING, TITLE_MAX_CHARS,
};

use crate::error::{ApiError, ApiResult};

type Object = Map<String, Value>;
type Result<T> = std::result::Result<T, ValidationError>;

/// Required on create, in the order they are reported when missing.
const BOOK_REQUIRED: [&str; 6] = ["title", "author", "year", "genre", "pages", "status"];

/// Parse a request body into a JSON object.
pub fn parse_object(body: &[u8]) -> ApiResult<Object> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::NotAnObject.into()),
    }
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

pub fn new_book(obj: &Object) -> Result<NewBook> {
    let missing: Vec<&'static str> = BOOK_REQUIRED
        .into_iter()
        .filter(|key| is_blank(obj.get(*key)))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequiredFields { fields: missing });
    }

    // Presence was checked above, so `required` only fails on type or range.
    let title = required_text("title", required(obj, "title")?)?;
    let author = required_text("author", required(obj, "author")?)?;
    let year = year(required(obj, "year")?)?;
    let genre = required_text("genre", required(obj, "genre")?)?;
    let pages = pages(required(obj, "pages")?)?;
    let status = status(required(obj, "status")?)?;

    let rating = match field(obj, "rating") {
        Patch::Value(v) => rating(v)?,
        Patch::Absent | Patch::Null => MIN_RATING,
    };
    let notes = match field(obj, "notes") {
        Patch::Value(v) => text("notes", v)?,
        Patch::Absent | Patch::Null => String::new(),
    };

    Ok(NewBook {
        title,
        author,
        year,
        genre,
        pages,
        rating,
        status,
        notes,
    })
}

/// `id`, `createdAt` and `updatedAt` are ignored; unknown keys are ignored.
pub fn book_patch(obj: &Object) -> Result<BookPatch> {
    Ok(BookPatch {
        title: required_field(obj, "title", |v| required_text("title", v))?,
        author: required_field(obj, "author", |v| required_text("author", v))?,
        year: required_field(obj, "year", year)?,
        genre: required_field(obj, "genre", |v| required_text("genre", v))?,
        pages: required_field(obj, "pages", pages)?,
        status: required_field(obj, "status", status)?,
        rating: optional_field(obj, "rating", rating)?,
        notes: optional_field(obj, "notes", |v| text("notes", v))?,
    })
}

fn year(v: &Value) -> Result<i32> {
    let n = integer("year", v)?;
    i32::try_from(n).map_err(|_| ValidationError::OutOfRange {
        field: "year",
        min: i32::MIN.into(),
        max: i32::MAX.into(),
    })
}

fn pages(v: &Value) -> Result<u32> {
    let n = integer("pages", v)?;
    u32::try_from(n).map_err(|_| ValidationError::OutOfRange {
        field: "pages",
        min: 0,
        max: u32::MAX.into(),
    })
}

fn rating(v: &Value) -> Result<u8> {
    let n = integer("rating", v)?;
    match u8::try_from(n) {
        Ok(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Ok(r),
        _ => Err(ValidationError::OutOfRange {
            field: "rating",
            min: MIN_RATING.into(),
            max: MAX_RATING.into(),
        }),
    }
}

fn status(v: &Value) -> Result<BookStatus> {
    match v {
        Value::String(s) => s.trim().parse(),
        _ => Err(ValidationError::WrongType {
            field: "status",
            expected: "one of unread, reading, completed",
        }),
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

pub fn new_task(obj: &Object) -> Result<NewTask> {
    let title = match field(obj, "title") {
        Patch::Value(v) => task_title(v)?,
        Patch::Absent | Patch::Null => return Err(ValidationError::Empty { field: "title" }),
    };
    let description = match field(obj, "description") {
        Patch::Value(v) => task_description(v)?,
        Patch::Absent | Patch::Null => String::new(),
    };
    let completed = match field(obj, "completed") {
        Patch::Value(v) => boolean("completed", v)?,
        Patch::Absent => false,
        Patch::Null => return Err(boolean_expected("completed")),
    };
    Ok(NewTask {
        title,
        description,
        completed,
    })
}

pub fn task_patch(obj: &Object) -> Result<TaskPatch> {
    let title = match field(obj, "title") {
        Patch::Absent => Patch::Absent,
        Patch::Null => return Err(ValidationError::Empty { field: "title" }),
        Patch::Value(v) => Patch::Value(task_title(v)?),
    };
    let completed = match field(obj, "completed") {
        Patch::Absent => Patch::Absent,
        Patch::Null => return Err(boolean_expected("completed")),
        Patch::Value(v) => Patch::Value(boolean("completed", v)?),
    };
    Ok(TaskPatch {
        title,
        description: optional_field(obj, "description", task_description)?,
        completed,
    })
}

/// Trimmed, non-empty, at most [`TITLE_MAX_CHARS`].
fn task_title(v: &Value) -> Result<String> {
    let title = required_text("title", v)?;
    max_chars("title", title, TITLE_MAX_CHARS)
}

fn task_description(v: &Value) -> Result<String> {
    let description = text("description", v)?;
    max_chars("description", description, DESCRIPTION_MAX_CHARS)
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn field<'a>(obj: &'a Object, key: &str) -> Patch<&'a Value> {
    match obj.get(key) {
        None => Patch::Absent,
        Some(Value::Null) => Patch::Null,
        Some(v) => Patch::Value(v),
    }
}

fn required<'a>(obj: &'a Object, key: &'static str) -> Result<&'a Value> {
    field(obj, key)
        .value()
        .copied()
        .ok_or(ValidationError::MissingRequiredFields { fields: vec![key] })
}

/// A field with no empty state: `null` is rejected.
fn required_field<T>(
    obj: &Object,
    key: &'static str,
    parse: impl FnOnce(&Value) -> Result<T>,
) -> Result<Patch<T>> {
    match field(obj, key) {
        Patch::Absent => Ok(Patch::Absent),
        Patch::Null => Err(ValidationError::NullNotAllowed { field: key }),
        Patch::Value(v) => parse(v).map(Patch::Value),
    }
}

/// A field where `null` resets to the default.
fn optional_field<T>(
    obj: &Object,
    key: &'static str,
    parse: impl FnOnce(&Value) -> Result<T>,
) -> Result<Patch<T>> {
    match field(obj, key) {
        Patch::Absent => Ok(Patch::Absent),
        Patch::Null => Ok(Patch::Null),
        Patch::Value(v) => parse(v).map(Patch::Value),
    }
}

/// Missing, `null`, or a whitespace-only string.
fn is_blank(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn text(field: &'static str, v: &Value) -> Result<String> {
    match v {
        Value::String(s) => Ok(s.trim().to_string()),
        _ => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn required_text(field: &'static str, v: &Value) -> Result<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ValidationError::Empty { field }),
    }
}

fn max_chars(field: &'static str, s: String, max: usize) -> Result<String> {
    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(s)
}

/// Integers, integral floats (`1949.0`) and numeric strings (`"1949"`).
fn integer(field: &'static str, v: &Value) -> Result<i64> {
    let parsed = match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or(ValidationError::WrongType {
        field,
        expected: "an integer",
    })
}

fn boolean(field: &'static str, v: &Value) -> Result<bool> {
    v.as_bool().ok_or_else(|| boolean_expected(field))
}

fn boolean_expected(field: &'static str) -> ValidationError {
    ValidationError::WrongType {
        field,
        expected: "a boolean",
    }
}

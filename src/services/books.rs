//! Book catalog normalization and review payload validation.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::{Number, Value};

pub const BOOKS_PATH: &str = "/books";

pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 5.0;
const DEFAULT_REVIEWER: &str = "Anon";

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Book record as the pages consume it: every field present, every field a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
}

/// Coerce a JSON value to display text. `null` and missing become `""`.
#[must_use]
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[must_use]
pub fn normalize_book(item: &Value) -> Book {
    Book {
        id: coerce_string(item.get("id")).trim().to_owned(),
        title: coerce_string(item.get("title")),
        author: coerce_string(item.get("author")),
        description: coerce_string(item.get("description")),
    }
}

/// Normalize a backend book list, dropping records without an identifier.
/// Returns the kept books and how many were dropped.
#[must_use]
pub fn normalize_books(items: &[Value]) -> (Vec<Book>, usize) {
    let (books, dropped): (Vec<Book>, Vec<Book>) = items.iter().map(normalize_book).partition(|b| !b.id.is_empty());
    (books, dropped.len())
}

/// Backend path for a book's reviews, with the id escaped as one path segment.
#[must_use]
pub fn reviews_path(book_id: &str) -> String {
    format!("{BOOKS_PATH}/{}/reviews", utf8_percent_encode(book_id, PATH_SEGMENT))
}

// =============================================================================
// REVIEWS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("A review must include 'text'.")]
    MissingText,
    #[error("The 'rating' field must be a number between 1 and 5.")]
    RatingOutOfRange,
}

/// Review body forwarded upstream. `rating` is omitted when not given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPayload {
    pub username: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Number>,
}

/// Validate a client review body. Non-object bodies are treated as empty.
///
/// # Errors
///
/// Returns an error when `text` is blank or `rating` is present but not a
/// finite number in 1..=5.
pub fn validate_review(body: &Value) -> Result<ReviewPayload, ReviewError> {
    let text = coerce_string(body.get("text")).trim().to_owned();
    if text.is_empty() {
        return Err(ReviewError::MissingText);
    }

    let username = match coerce_string(body.get("username")).trim() {
        "" => DEFAULT_REVIEWER.to_owned(),
        name => name.to_owned(),
    };
    let rating = parse_rating(body.get("rating"))?;

    Ok(ReviewPayload { username, text, rating })
}

fn parse_rating(raw: Option<&Value>) -> Result<Option<Number>, ReviewError> {
    let number = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.is_empty() => return Ok(None),
        Some(Value::Number(n)) => n.clone(),
        Some(Value::String(s)) => {
            let parsed = s.trim().parse::<f64>().map_err(|_| ReviewError::RatingOutOfRange)?;
            number_from_f64(parsed).ok_or(ReviewError::RatingOutOfRange)?
        }
        Some(_) => return Err(ReviewError::RatingOutOfRange),
    };

    match number.as_f64() {
        Some(v) if v.is_finite() && (RATING_MIN..=RATING_MAX).contains(&v) => Ok(Some(number)),
        _ => Err(ReviewError::RatingOutOfRange),
    }
}

/// Whole numbers stay integers on the wire.
#[allow(clippy::cast_possible_truncation)]
fn number_from_f64(v: f64) -> Option<Number> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        Some(Number::from(v as i64))
    } else {
        Number::from_f64(v)
    }
}

#[cfg(test)]
#[path = "books_test.rs"]
mod tests;

//! Todo lifecycle rules: category fallback, update outcomes and timestamp
//! stamping.

use chrono::{Duration, DurationRound, Utc};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Entity name used in not-found errors for todo items.
pub const TODO_ENTITY: &str = "TodoItem";

/// Entity name used in not-found errors for categories.
pub const CATEGORY_ENTITY: &str = "Category";

/// The category a caller asked for on create/update.
///
/// A missing, `null` or nil-UUID category id on the wire is `Omitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryChoice {
    Provided(DbId),
    Omitted,
}

impl From<Option<DbId>> for CategoryChoice {
    fn from(value: Option<DbId>) -> Self {
        match value {
            Some(id) if !id.is_nil() => CategoryChoice::Provided(id),
            _ => CategoryChoice::Omitted,
        }
    }
}

impl CategoryChoice {
    /// The explicitly provided id, if any.
    pub fn provided(self) -> Option<DbId> {
        match self {
            CategoryChoice::Provided(id) => Some(id),
            CategoryChoice::Omitted => None,
        }
    }
}

/// Resolve the category for a new todo.
///
/// `fallback` is the store's first category. With no explicit choice and
/// no fallback the store has not been seeded, which is a configuration
/// error rather than a client mistake.
pub fn resolve_category(
    choice: CategoryChoice,
    fallback: Option<DbId>,
) -> Result<DbId, CoreError> {
    match choice {
        CategoryChoice::Provided(id) => Ok(id),
        CategoryChoice::Omitted => fallback.ok_or_else(|| {
            CoreError::Configuration(
                "No categories found in the store; seed categories first".to_string(),
            )
        }),
    }
}

/// Result of a read-compare-write update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    Updated(T),
    /// Another writer changed the row between read and write.
    Conflict,
    NotFound,
}

impl<T> UpdateOutcome<T> {
    /// Convert into a `Result`, mapping the non-success branches onto
    /// [`CoreError`].
    pub fn into_result(self, entity: &'static str, id: DbId) -> Result<T, CoreError> {
        match self {
            UpdateOutcome::Updated(value) => Ok(value),
            UpdateOutcome::Conflict => Err(CoreError::Conflict(format!(
                "{entity} {id} was modified by another request"
            ))),
            UpdateOutcome::NotFound => Err(CoreError::NotFound { entity, id }),
        }
    }
}

/// Reject a body whose id disagrees with the path id.
pub fn ensure_matching_ids(path: DbId, body: DbId) -> Result<(), CoreError> {
    if path == body {
        Ok(())
    } else {
        Err(CoreError::IdMismatch { path, body })
    }
}

/// Current time truncated to microseconds, the resolution of `timestamptz`.
pub fn now() -> Timestamp {
    truncate_micros(Utc::now())
}

fn truncate_micros(ts: Timestamp) -> Timestamp {
    ts.duration_trunc(Duration::microseconds(1)).unwrap_or(ts)
}

/// Compute the `updated_at` for a write.
///
/// `previous` is the latest of `created_at` and the prior `updated_at`. The
/// result is strictly later than `previous` even when the clock has not
/// advanced (or stepped backwards) since the last write.
pub fn stamp_update(previous: Timestamp, now: Timestamp) -> Timestamp {
    let now = truncate_micros(now);
    let floor = truncate_micros(previous) + Duration::microseconds(1);
    now.max(floor)
}

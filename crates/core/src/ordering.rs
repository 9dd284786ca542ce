//! Sort hints for the todo list (`?_sort=createdAt&_order=desc`).

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Column the todo list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "createdat" | "created_at" => Ok(SortField::CreatedAt),
            "updatedat" | "updated_at" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            other => Err(CoreError::Validation(format!(
                "Unknown sort field '{other}'; expected createdAt, updatedAt or title"
            ))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Title => "title",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(CoreError::Validation(format!(
                "Unknown sort order '{other}'; expected asc or desc"
            ))),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

/// Requested ordering of the todo list. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl TodoOrder {
    /// Parse optional `_sort` / `_order` query values. Either may be
    /// omitted, in which case the default for that half applies.
    pub fn parse(sort: Option<&str>, order: Option<&str>) -> Result<Self, CoreError> {
        let field = match sort.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse()?,
            None => SortField::default(),
        };
        let direction = match order.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse()?,
            None => SortDirection::default(),
        };
        Ok(Self { field, direction })
    }
}

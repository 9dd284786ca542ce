//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Ordering hint for the todo list (`?_sort=createdAt&_order=desc`).
///
/// Values are validated by `TodoOrder::parse`; both are optional.
#[derive(Debug, Default, Deserialize)]
pub struct ListTodosParams {
    #[serde(rename = "_sort")]
    pub sort: Option<String>,
    #[serde(rename = "_order")]
    pub order: Option<String>,
}

//! Todo item entity model and DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use taskboard_core::todo::{stamp_update, CategoryChoice};
use taskboard_core::types::{DbId, Timestamp};
use taskboard_core::validation::non_blank;
use validator::Validate;

use crate::models::category::Category;

/// A row from the `todo_items` table, including the internal row version.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TodoRecord {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub category_id: DbId,
    pub version: i64,
}

impl TodoRecord {
    /// The most recent write time of this row.
    pub fn last_modified(&self) -> Timestamp {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Produce the next version of this row with `changes` applied and
    /// `updated_at` stamped strictly after the previous write.
    pub fn apply(&self, changes: &TodoChanges, now: Timestamp) -> TodoRecord {
        TodoRecord {
            id: self.id,
            title: changes.title.clone().unwrap_or_else(|| self.title.clone()),
            description: match &changes.description {
                Some(description) => description.clone(),
                None => self.description.clone(),
            },
            completed: changes.completed.unwrap_or(self.completed),
            created_at: self.created_at,
            updated_at: Some(stamp_update(self.last_modified(), now)),
            category_id: changes.category.provided().unwrap_or(self.category_id),
            version: self.version + 1,
        }
    }

    /// Attach the joined category to build the wire shape.
    pub fn into_item(self, category: Category) -> TodoItem {
        TodoItem {
            id: self.id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
            category_id: self.category_id,
            category,
        }
    }
}

/// `todo_items` joined with `categories`, as selected by the repository.
#[derive(Debug, Clone, FromRow)]
pub struct TodoWithCategoryRow {
    #[sqlx(flatten)]
    pub todo: TodoRecord,
    pub category_name: String,
    pub category_description: Option<String>,
    pub category_color: String,
}

impl From<TodoWithCategoryRow> for TodoItem {
    fn from(row: TodoWithCategoryRow) -> Self {
        let category = Category {
            id: row.todo.category_id,
            name: row.category_name,
            description: row.category_description,
            color: row.category_color,
        };
        row.todo.into_item(category)
    }
}

/// A todo item as returned to clients, always with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
    pub category_id: DbId,
    pub category: Category,
}

/// DTO for creating a todo (`POST /todos`).
///
/// Client-sent `id`, `completed`, `createdAt` and `updatedAt` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<DbId>,
}

/// DTO for replacing a todo's mutable fields (`PUT /todos/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    pub id: DbId,
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(
        default,
        deserialize_with = "optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<DbId>,
}

/// DTO for partially updating a todo (`PATCH /todos/{id}`). Absent fields
/// keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatchTodo {
    #[serde(
        default,
        deserialize_with = "optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_blank"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<DbId>,
}

/// Field changes applied by an update. `None` keeps the stored value;
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub category: CategoryChoice,
}

impl From<UpdateTodo> for TodoChanges {
    fn from(input: UpdateTodo) -> Self {
        Self {
            title: Some(input.title),
            description: Some(input.description),
            completed: Some(input.completed),
            category: input.category_id.into(),
        }
    }
}

impl From<PatchTodo> for TodoChanges {
    fn from(input: PatchTodo) -> Self {
        Self {
            title: input.title,
            description: input.description.map(Some),
            completed: input.completed,
            category: input.category_id.into(),
        }
    }
}

/// A fully resolved todo ready to insert.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category_id: DbId,
    pub created_at: Timestamp,
}

impl NewTodo {
    /// Build the insert payload: fresh id, `completed = false` implied.
    pub fn new(input: CreateTodo, category_id: DbId, created_at: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::now_v7(),
            title: input.title,
            description: input.description,
            category_id,
            created_at,
        }
    }

    pub fn into_record(self) -> TodoRecord {
        TodoRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            completed: false,
            created_at: self.created_at,
            updated_at: None,
            category_id: self.category_id,
            version: 1,
        }
    }
}

/// Accept `null`, `""` and UUID strings for optional id fields so the
/// frontend's empty-select value deserializes as "not provided".
fn optional_id<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DbId::parse_str(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

//! The repository interface handlers depend on.
//!
//! [`TodoStore`] is implemented by [`postgres::PgStore`] (production) and
//! [`memory::MemoryStore`] (local development and tests). Handlers receive
//! it through application state as `Arc<dyn TodoStore>`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use taskboard_core::ordering::TodoOrder;
use taskboard_core::todo::UpdateOutcome;
use taskboard_core::types::{DbId, Timestamp};

use crate::models::category::{Category, CreateCategory};
use crate::models::todo::{NewTodo, TodoChanges, TodoItem, TodoRecord};

/// Errors surfaced by a [`TodoStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write referenced a category that does not exist.
    #[error("Category {0} does not exist")]
    UnknownCategory(DbId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// All categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// The fallback category for todos created without one: the first by
    /// name, then id.
    async fn first_category(&self) -> Result<Option<Category>, StoreError>;

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError>;

    /// Remove a category together with all todos referencing it.
    async fn delete_category(&self, id: DbId) -> Result<bool, StoreError>;

    async fn list_todos(&self, order: TodoOrder) -> Result<Vec<TodoItem>, StoreError>;

    async fn find_todo(&self, id: DbId) -> Result<Option<TodoItem>, StoreError>;

    /// The bare row with its version, for read-modify-write.
    async fn find_todo_record(&self, id: DbId) -> Result<Option<TodoRecord>, StoreError>;

    async fn todo_exists(&self, id: DbId) -> Result<bool, StoreError>;

    async fn insert_todo(&self, input: NewTodo) -> Result<TodoItem, StoreError>;

    /// Compare-and-swap write: persist `next` only if the stored row is at
    /// `expected_version`. Returns `false` if the compare failed.
    async fn replace_todo(&self, next: &TodoRecord, expected_version: i64)
        -> Result<bool, StoreError>;

    async fn delete_todo(&self, id: DbId) -> Result<bool, StoreError>;

    /// Read the row, apply `changes`, and write it back under an optimistic
    /// version check.
    ///
    /// A failed compare is re-checked: if the row still exists the result is
    /// [`UpdateOutcome::Conflict`], otherwise [`UpdateOutcome::NotFound`].
    /// Nothing is retried.
    async fn update_todo(
        &self,
        id: DbId,
        changes: &TodoChanges,
        now: Timestamp,
    ) -> Result<UpdateOutcome<TodoItem>, StoreError> {
        let Some(current) = self.find_todo_record(id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };

        let next = current.apply(changes, now);
        if self.replace_todo(&next, current.version).await? {
            return Ok(match self.find_todo(id).await? {
                Some(item) => UpdateOutcome::Updated(item),
                None => UpdateOutcome::NotFound,
            });
        }

        if self.todo_exists(id).await? {
            tracing::error!(todo_id = %id, "Concurrent modification detected while updating todo");
            Ok(UpdateOutcome::Conflict)
        } else {
            Ok(UpdateOutcome::NotFound)
        }
    }
}

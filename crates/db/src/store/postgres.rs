//! PostgreSQL-backed [`TodoStore`].

use async_trait::async_trait;
use taskboard_core::ordering::TodoOrder;
use taskboard_core::types::DbId;

use crate::models::category::{Category, CreateCategory};
use crate::models::todo::{NewTodo, TodoItem, TodoRecord};
use crate::repositories::{CategoryRepo, TodoRepo};
use crate::store::{StoreError, TodoStore};
use crate::DbPool;

/// PostgreSQL foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// [`TodoStore`] over a connection pool; each call checks out its own
/// connection, so no unit of work spans requests.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Translate a foreign key violation on `category_id` into
/// [`StoreError::UnknownCategory`].
fn map_category_fk(err: sqlx::Error, category_id: DbId) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return StoreError::UnknownCategory(category_id);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl TodoStore for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(CategoryRepo::list(&self.pool).await?)
    }

    async fn first_category(&self) -> Result<Option<Category>, StoreError> {
        Ok(CategoryRepo::first(&self.pool).await?)
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError> {
        Ok(CategoryRepo::create(&self.pool, input).await?)
    }

    async fn delete_category(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(CategoryRepo::delete(&self.pool, id).await?)
    }

    async fn list_todos(&self, order: TodoOrder) -> Result<Vec<TodoItem>, StoreError> {
        Ok(TodoRepo::list(&self.pool, order).await?)
    }

    async fn find_todo(&self, id: DbId) -> Result<Option<TodoItem>, StoreError> {
        Ok(TodoRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_todo_record(&self, id: DbId) -> Result<Option<TodoRecord>, StoreError> {
        Ok(TodoRepo::find_record(&self.pool, id).await?)
    }

    async fn todo_exists(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(TodoRepo::exists(&self.pool, id).await?)
    }

    async fn insert_todo(&self, input: NewTodo) -> Result<TodoItem, StoreError> {
        TodoRepo::create(&self.pool, &input)
            .await
            .map_err(|e| map_category_fk(e, input.category_id))
    }

    async fn replace_todo(
        &self,
        next: &TodoRecord,
        expected_version: i64,
    ) -> Result<bool, StoreError> {
        TodoRepo::replace(&self.pool, next, expected_version)
            .await
            .map_err(|e| map_category_fk(e, next.category_id))
    }

    async fn delete_todo(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(TodoRepo::delete(&self.pool, id).await?)
    }
}

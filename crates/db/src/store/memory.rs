//! In-process [`TodoStore`] used for local development and tests.
//!
//! Mirrors the PostgreSQL schema's rules: todos must reference an existing
//! category, deleting a category cascades to its todos, and writes go
//! through the same row-version compare.

use std::cmp::Ordering;

use async_trait::async_trait;
use taskboard_core::ordering::{SortDirection, SortField, TodoOrder};
use taskboard_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::category::{default_categories, Category, CreateCategory};
use crate::models::todo::{NewTodo, TodoItem, TodoRecord};
use crate::store::{StoreError, TodoStore};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    todos: Vec<TodoRecord>,
}

impl Tables {
    fn category(&self, id: DbId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn join(&self, record: &TodoRecord) -> Option<TodoItem> {
        self.category(record.category_id)
            .cloned()
            .map(|category| record.clone().into_item(category))
    }

    fn sorted_categories(&self) -> Vec<Category> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        categories
    }
}

/// [`TodoStore`] holding both tables behind a single async `RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// An empty store with no categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the same categories as the initial migration.
    pub fn seeded() -> Self {
        Self::with_categories(default_categories())
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                categories,
                todos: Vec::new(),
            }),
        }
    }
}

fn compare(a: &TodoRecord, b: &TodoRecord, order: TodoOrder) -> Ordering {
    let primary = match order.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Title => a.title.cmp(&b.title),
        SortField::UpdatedAt => match (a.updated_at, b.updated_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            // Nulls last regardless of direction.
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    let ordering = primary.then(a.id.cmp(&b.id));
    match order.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.tables.read().await.sorted_categories())
    }

    async fn first_category(&self) -> Result<Option<Category>, StoreError> {
        Ok(self.tables.read().await.sorted_categories().into_iter().next())
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError> {
        let category = Category {
            id: uuid::Uuid::now_v7(),
            name: input.name.clone(),
            description: input.description.clone(),
            color: input.color.clone(),
        };
        self.tables.write().await.categories.push(category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        if tables.categories.len() == before {
            return Ok(false);
        }
        tables.todos.retain(|t| t.category_id != id);
        Ok(true)
    }

    async fn list_todos(&self, order: TodoOrder) -> Result<Vec<TodoItem>, StoreError> {
        let tables = self.tables.read().await;
        let mut records: Vec<&TodoRecord> = tables.todos.iter().collect();
        records.sort_by(|a, b| compare(a, b, order));
        Ok(records.into_iter().filter_map(|r| tables.join(r)).collect())
    }

    async fn find_todo(&self, id: DbId) -> Result<Option<TodoItem>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .find(|t| t.id == id)
            .and_then(|r| tables.join(r)))
    }

    async fn find_todo_record(&self, id: DbId) -> Result<Option<TodoRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn todo_exists(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.todos.iter().any(|t| t.id == id))
    }

    async fn insert_todo(&self, input: NewTodo) -> Result<TodoItem, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.category(input.category_id).cloned() else {
            return Err(StoreError::UnknownCategory(input.category_id));
        };
        let record = input.into_record();
        tables.todos.push(record.clone());
        Ok(record.into_item(category))
    }

    async fn replace_todo(
        &self,
        next: &TodoRecord,
        expected_version: i64,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.category(next.category_id).is_none() {
            return Err(StoreError::UnknownCategory(next.category_id));
        }
        match tables
            .todos
            .iter_mut()
            .find(|t| t.id == next.id && t.version == expected_version)
        {
            Some(slot) => {
                *slot = next.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_todo(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables.todos.retain(|t| t.id != id);
        Ok(tables.todos.len() < before)
    }
}

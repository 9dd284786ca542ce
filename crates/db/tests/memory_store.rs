//! Store-level behaviour exercised against the in-memory implementation:
//! category fallback, cascade delete, ordering and the optimistic update
//! path including the conflict branch.

use std::sync::atomic::{AtomicBool, Ordering};

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::Duration;
use taskboard_core::ordering::{SortDirection, SortField, TodoOrder};
use taskboard_core::todo::{now, resolve_category, CategoryChoice, UpdateOutcome};
use taskboard_core::types::{DbId, Timestamp};
use taskboard_db::models::category::{default_categories, Category, CreateCategory};
use taskboard_db::models::todo::{CreateTodo, NewTodo, PatchTodo, TodoChanges, TodoItem, TodoRecord};
use taskboard_db::{MemoryStore, StoreError, TodoStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert(store: &dyn TodoStore, title: &str, created_at: Timestamp) -> TodoItem {
    let fallback = store.first_category().await.unwrap().map(|c| c.id);
    let category_id = resolve_category(CategoryChoice::Omitted, fallback).unwrap();
    let input = CreateTodo {
        title: title.to_string(),
        ..Default::default()
    };
    store
        .insert_todo(NewTodo::new(input, category_id, created_at))
        .await
        .unwrap()
}

async fn insert_into(store: &dyn TodoStore, title: &str, category_id: DbId) -> TodoItem {
    let input = CreateTodo {
        title: title.to_string(),
        category_id: Some(category_id),
        ..Default::default()
    };
    store
        .insert_todo(NewTodo::new(input, category_id, now()))
        .await
        .unwrap()
}

fn complete() -> TodoChanges {
    TodoChanges::from(PatchTodo {
        completed: Some(true),
        ..Default::default()
    })
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeded_store_falls_back_to_first_category_by_name() {
    let store = MemoryStore::seeded();
    let todo = insert(&store, "Buy milk", now()).await;

    assert_eq!(todo.category.name, "Personal");
    assert_eq!(todo.category_id, todo.category.id);
    assert!(!todo.completed);
    assert!(todo.updated_at.is_none());
}

#[tokio::test]
async fn empty_store_has_no_fallback_category() {
    let store = MemoryStore::new();
    let fallback = store.first_category().await.unwrap().map(|c| c.id);
    assert!(resolve_category(CategoryChoice::Omitted, fallback).is_err());
}

#[tokio::test]
async fn insert_with_unknown_category_is_rejected() {
    let store = MemoryStore::seeded();
    let missing = DbId::new_v4();
    let input = CreateTodo {
        title: "Orphan".into(),
        ..Default::default()
    };
    let err = store
        .insert_todo(NewTodo::new(input, missing, now()))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::UnknownCategory(id) if id == missing);
}

#[tokio::test]
async fn deleting_category_cascades_to_its_todos() {
    let store = MemoryStore::seeded();
    let errands = store
        .create_category(&CreateCategory {
            name: "Errands".into(),
            description: None,
            color: "#34C759".into(),
        })
        .await
        .unwrap();

    // "Errands" now sorts first, so both rows name their category.
    let personal = default_categories()
        .into_iter()
        .find(|c| c.name == "Personal")
        .unwrap();
    let kept = insert_into(&store, "Stays", personal.id).await;
    let doomed = insert_into(&store, "Goes", errands.id).await;
    assert_eq!(store.first_category().await.unwrap().unwrap().id, errands.id);

    assert!(store.delete_category(errands.id).await.unwrap());

    assert!(store.find_todo(doomed.id).await.unwrap().is_none());
    assert!(store.find_todo(kept.id).await.unwrap().is_some());
    assert!(!store.delete_category(errands.id).await.unwrap());
}

#[tokio::test]
async fn categories_are_listed_by_name() {
    let store = MemoryStore::seeded();
    let names: Vec<String> = store
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c: Category| c.name)
        .collect();
    assert_eq!(names, vec!["Personal", "Work"]);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_defaults_to_newest_first() {
    let store = MemoryStore::seeded();
    let base = now();
    insert(&store, "old", base).await;
    insert(&store, "new", base + Duration::seconds(10)).await;
    insert(&store, "middle", base + Duration::seconds(5)).await;

    let titles: Vec<String> = store
        .list_todos(TodoOrder::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["new", "middle", "old"]);
}

#[tokio::test]
async fn list_by_updated_at_puts_untouched_rows_last() {
    let store = MemoryStore::seeded();
    let base = now();
    let touched = insert(&store, "touched", base).await;
    insert(&store, "untouched", base + Duration::seconds(1)).await;
    store
        .update_todo(touched.id, &complete(), base + Duration::seconds(2))
        .await
        .unwrap();

    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let order = TodoOrder {
            field: SortField::UpdatedAt,
            direction,
        };
        let todos = store.list_todos(order).await.unwrap();
        assert_eq!(todos.last().unwrap().title, "untouched");
    }
}

#[tokio::test]
async fn title_order_is_bytewise() {
    let store = MemoryStore::seeded();
    for title in ["banana", "apple", "Apple"] {
        insert(&store, title, now()).await;
    }

    let order = TodoOrder {
        field: SortField::Title,
        direction: SortDirection::Asc,
    };
    let titles: Vec<String> = store
        .list_todos(order)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Apple", "apple", "banana"]);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_stamps_strictly_increasing_timestamps() {
    let store = MemoryStore::seeded();
    let created_at = now();
    let todo = insert(&store, "Stamp me", created_at).await;

    // A clock that has not moved still yields a later stamp.
    let first = store
        .update_todo(todo.id, &complete(), created_at)
        .await
        .unwrap();
    let first = assert_matches!(first, UpdateOutcome::Updated(item) => item);
    let first_stamp = first.updated_at.unwrap();
    assert!(first_stamp > created_at);
    assert!(first.completed);

    let second = store
        .update_todo(todo.id, &complete(), created_at)
        .await
        .unwrap();
    let second = assert_matches!(second, UpdateOutcome::Updated(item) => item);
    assert!(second.updated_at.unwrap() > first_stamp);
    assert_eq!(second.created_at, created_at);
}

#[tokio::test]
async fn update_missing_todo_is_not_found() {
    let store = MemoryStore::seeded();
    let outcome = store
        .update_todo(DbId::new_v4(), &complete(), now())
        .await
        .unwrap();
    assert_matches!(outcome, UpdateOutcome::NotFound);
}

#[tokio::test]
async fn stale_version_write_is_refused() {
    let store = MemoryStore::seeded();
    let todo = insert(&store, "Race", now()).await;
    let stale = store.find_todo_record(todo.id).await.unwrap().unwrap();

    store.update_todo(todo.id, &complete(), now()).await.unwrap();

    let next = stale.apply(&complete(), now());
    assert!(!store.replace_todo(&next, stale.version).await.unwrap());
}

#[tokio::test]
async fn update_to_unknown_category_is_rejected() {
    let store = MemoryStore::seeded();
    let todo = insert(&store, "Move me", now()).await;
    let changes = TodoChanges::from(PatchTodo {
        category_id: Some(DbId::new_v4()),
        ..Default::default()
    });
    let err = store.update_todo(todo.id, &changes, now()).await.unwrap_err();
    assert_matches!(err, StoreError::UnknownCategory(_));
}

// ---------------------------------------------------------------------------
// Conflict branch: a store that lets another writer in right after the read.
// ---------------------------------------------------------------------------

/// Wraps a [`MemoryStore`] and, once, performs a competing write (or delete)
/// immediately after `find_todo_record` returns.
struct RacingStore {
    inner: MemoryStore,
    delete_instead: bool,
    raced: AtomicBool,
}

impl RacingStore {
    fn new(delete_instead: bool) -> Self {
        Self {
            inner: MemoryStore::seeded(),
            delete_instead,
            raced: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl TodoStore for RacingStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.inner.list_categories().await
    }
    async fn first_category(&self) -> Result<Option<Category>, StoreError> {
        self.inner.first_category().await
    }
    async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError> {
        self.inner.create_category(input).await
    }
    async fn delete_category(&self, id: DbId) -> Result<bool, StoreError> {
        self.inner.delete_category(id).await
    }
    async fn list_todos(&self, order: TodoOrder) -> Result<Vec<TodoItem>, StoreError> {
        self.inner.list_todos(order).await
    }
    async fn find_todo(&self, id: DbId) -> Result<Option<TodoItem>, StoreError> {
        self.inner.find_todo(id).await
    }
    async fn find_todo_record(&self, id: DbId) -> Result<Option<TodoRecord>, StoreError> {
        let record = self.inner.find_todo_record(id).await?;
        if record.is_some() && !self.raced.swap(true, Ordering::SeqCst) {
            if self.delete_instead {
                self.inner.delete_todo(id).await?;
            } else {
                self.inner.update_todo(id, &complete(), now()).await?;
            }
        }
        Ok(record)
    }
    async fn todo_exists(&self, id: DbId) -> Result<bool, StoreError> {
        self.inner.todo_exists(id).await
    }
    async fn insert_todo(&self, input: NewTodo) -> Result<TodoItem, StoreError> {
        self.inner.insert_todo(input).await
    }
    async fn replace_todo(
        &self,
        next: &TodoRecord,
        expected_version: i64,
    ) -> Result<bool, StoreError> {
        self.inner.replace_todo(next, expected_version).await
    }
    async fn delete_todo(&self, id: DbId) -> Result<bool, StoreError> {
        self.inner.delete_todo(id).await
    }
}

#[tokio::test]
async fn concurrent_modification_surfaces_conflict() {
    let store = RacingStore::new(false);
    let todo = insert(&store, "Contended", now()).await;

    let outcome = store.update_todo(todo.id, &complete(), now()).await.unwrap();
    assert_matches!(outcome, UpdateOutcome::Conflict);

    // The competing write is the one that landed; no retry happened.
    let stored = store.inner.find_todo_record(todo.id).await.unwrap().unwrap();
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn concurrent_delete_surfaces_not_found() {
    let store = RacingStore::new(true);
    let todo = insert(&store, "Vanishing", now()).await;

    let outcome = store.update_todo(todo.id, &complete(), now()).await.unwrap();
    assert_matches!(outcome, UpdateOutcome::NotFound);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deleting_missing_todo_leaves_store_unchanged() {
    let store = MemoryStore::seeded();
    insert(&store, "Keep", now()).await;

    assert!(!store.delete_todo(DbId::new_v4()).await.unwrap());
    assert_eq!(store.list_todos(TodoOrder::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_removes_the_row() {
    let store = MemoryStore::seeded();
    let todo = insert(&store, "Drop", now()).await;

    assert!(store.delete_todo(todo.id).await.unwrap());
    assert!(store.find_todo(todo.id).await.unwrap().is_none());
    assert!(!store.todo_exists(todo.id).await.unwrap());
}

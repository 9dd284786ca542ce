//! Repository for the `todo_items` table.

use sqlx::PgPool;
use taskboard_core::ordering::{SortDirection, SortField, TodoOrder};
use taskboard_core::types::DbId;

use crate::models::todo::{NewTodo, TodoItem, TodoRecord, TodoWithCategoryRow};

/// Row columns, without the join.
const COLUMNS: &str =
    "id, title, description, completed, created_at, updated_at, category_id, version";

/// Todo columns (aliased `t`) plus the joined category (aliased `c`).
const JOINED_COLUMNS: &str = "t.id, t.title, t.description, t.completed, t.created_at, \
     t.updated_at, t.category_id, t.version, \
     c.name AS category_name, c.description AS category_description, \
     c.color AS category_color";

/// Provides CRUD operations for todo items.
pub struct TodoRepo;

impl TodoRepo {
    /// List every todo with its category in the requested order.
    pub async fn list(pool: &PgPool, order: TodoOrder) -> Result<Vec<TodoItem>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM todo_items t
             JOIN categories c ON c.id = t.category_id
             ORDER BY {}",
            order_clause(order)
        );
        let rows = sqlx::query_as::<_, TodoWithCategoryRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    /// Find a todo with its category by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TodoItem>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM todo_items t
             JOIN categories c ON c.id = t.category_id
             WHERE t.id = $1"
        );
        let row = sqlx::query_as::<_, TodoWithCategoryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(TodoItem::from))
    }

    /// Find the bare row (with its version) for a read-modify-write.
    pub async fn find_record(pool: &PgPool, id: DbId) -> Result<Option<TodoRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todo_items WHERE id = $1");
        sqlx::query_as::<_, TodoRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM todo_items WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Insert a new todo, returning it joined with its category.
    pub async fn create(pool: &PgPool, input: &NewTodo) -> Result<TodoItem, sqlx::Error> {
        let query = format!(
            "WITH t AS (
                 INSERT INTO todo_items (id, title, description, completed, created_at, category_id)
                 VALUES ($1, $2, $3, FALSE, $4, $5)
                 RETURNING {COLUMNS}
             )
             SELECT {JOINED_COLUMNS}
             FROM t
             JOIN categories c ON c.id = t.category_id"
        );
        let row = sqlx::query_as::<_, TodoWithCategoryRow>(&query)
            .bind(input.id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.created_at)
            .bind(input.category_id)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Write `next` only if the stored row is still at `expected_version`.
    ///
    /// Returns `false` when the row was changed or removed since it was read.
    pub async fn replace(
        pool: &PgPool,
        next: &TodoRecord,
        expected_version: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE todo_items SET
                title = $3,
                description = $4,
                completed = $5,
                category_id = $6,
                updated_at = $7,
                version = $8
             WHERE id = $1 AND version = $2",
        )
        .bind(next.id)
        .bind(expected_version)
        .bind(&next.title)
        .bind(&next.description)
        .bind(next.completed)
        .bind(next.category_id)
        .bind(next.updated_at)
        .bind(next.version)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a todo by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todo_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build the `ORDER BY` body from a validated [`TodoOrder`]. Only fixed
/// identifiers are interpolated.
fn order_clause(order: TodoOrder) -> String {
    let column = match order.field {
        SortField::CreatedAt => "t.created_at",
        SortField::UpdatedAt => "t.updated_at",
        // Byte order, matching `MemoryStore` regardless of database locale.
        SortField::Title => "t.title COLLATE \"C\"",
    };
    let direction = match order.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    format!("{column} {direction} NULLS LAST, t.id {direction}")
}

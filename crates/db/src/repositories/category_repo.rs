//! Repository for the `categories` table.

use sqlx::PgPool;
use taskboard_core::types::DbId;

use crate::models::category::{Category, CreateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, color";

/// Provides read access and seeding for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(r#"SELECT {COLUMNS} FROM categories ORDER BY name COLLATE "C", id"#);
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// The category new todos fall back to when none is given.
    pub async fn first(pool: &PgPool) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!(r#"SELECT {COLUMNS} FROM categories ORDER BY name COLLATE "C", id LIMIT 1"#);
        sqlx::query_as::<_, Category>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Insert a category with a fresh id, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (id, name, description, color)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(uuid::Uuid::now_v7())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Delete a category and, through the foreign key, all of its todos.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

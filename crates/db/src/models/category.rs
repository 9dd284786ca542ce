//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::types::DbId;

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

/// DTO for seeding a category. Not exposed over HTTP.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}

/// The two categories every fresh store starts with, mirroring the
/// initial migration.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category {
            id: uuid::uuid!("210eec23-535a-403a-b400-316651db0402"),
            name: "Work".to_string(),
            description: Some("Work related tasks".to_string()),
            color: "#007AFF".to_string(),
        },
        Category {
            id: uuid::uuid!("51d48e62-31d8-43f0-ab1e-6667ec9ecf73"),
            name: "Personal".to_string(),
            description: Some("Personal tasks".to_string()),
            color: "#FF9500".to_string(),
        },
    ]
}

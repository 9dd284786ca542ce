//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::Json;
use taskboard_db::models::category::Category;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    tracing::info!("Fetching all categories");
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}

pub mod categories;
pub mod health;
pub mod todos;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /todos                  list (GET), create (POST)
/// /todos/{id}             get, replace (PUT), patch, delete
/// /tasks, /tasks/{id}     alias of /todos
///
/// /categories             list (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/todos", todos::router())
        .nest("/tasks", todos::router())
        .nest("/categories", categories::router())
}

//! Handlers for the `/todos` resource.
//!
//! Each handler performs one store call (updates do a read followed by a
//! version-checked write) and translates the result into a status code.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use taskboard_core::error::CoreError;
use taskboard_core::ordering::TodoOrder;
use taskboard_core::todo::{
    ensure_matching_ids, now, resolve_category, CategoryChoice, UpdateOutcome, TODO_ENTITY,
};
use taskboard_core::types::DbId;
use taskboard_core::validation::validate;
use taskboard_db::models::todo::{CreateTodo, NewTodo, PatchTodo, TodoChanges, TodoItem, UpdateTodo};

use crate::error::{AppError, AppResult};
use crate::query::ListTodosParams;
use crate::state::AppState;

/// GET /todos
///
/// All todos with their category, newest first unless `_sort`/`_order`
/// say otherwise.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListTodosParams>, QueryRejection>,
) -> AppResult<Json<Vec<TodoItem>>> {
    let Query(params) = query?;
    let order = TodoOrder::parse(params.sort.as_deref(), params.order.as_deref())?;
    tracing::info!(sort = %order.field, order = %order.direction, "Fetching all todos");

    let todos = state.store.list_todos(order).await?;
    Ok(Json(todos))
}

/// GET /todos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<TodoItem>> {
    let Path(id) = path?;
    tracing::debug!(todo_id = %id, "Fetching todo");

    let todo = state
        .store
        .find_todo(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: TODO_ENTITY,
            id,
        }))?;
    Ok(Json(todo))
}

/// POST /todos
///
/// Without a category the todo lands in the store's first category.
/// Responds 201 with the created todo and a `Location` header.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    validate(&input)?;
    tracing::info!(title = %input.title, "Creating todo");

    let choice = CategoryChoice::from(input.category_id);
    let fallback = match choice {
        CategoryChoice::Provided(_) => None,
        CategoryChoice::Omitted => {
            let first = state.store.first_category().await?;
            if let Some(category) = &first {
                tracing::info!(
                    category = %category.name,
                    "No category provided, defaulting to first category",
                );
            }
            first.map(|c| c.id)
        }
    };
    let category_id = resolve_category(choice, fallback)?;

    let todo = state
        .store
        .insert_todo(NewTodo::new(input, category_id, now()))
        .await?;

    tracing::info!(todo_id = %todo.id, category_id = %todo.category_id, "Todo created");

    let location = format!("/todos/{}", todo.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(todo),
    ))
}

/// PUT /todos/{id}
///
/// Replaces title, description and completion (and the category when one
/// is given). The body id must match the path id. Responds 204.
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    let Json(input) = payload?;
    ensure_matching_ids(id, input.id)?;
    validate(&input)?;

    apply_changes(&state, id, TodoChanges::from(input)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /todos/{id}
///
/// Applies only the fields present in the body. A body id, if sent, must
/// match the path id. Responds 200 with the updated todo.
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<PatchTodo>, JsonRejection>,
) -> AppResult<Json<TodoItem>> {
    let Path(id) = path?;
    let Json(input) = payload?;
    if let Some(body_id) = input.id {
        ensure_matching_ids(id, body_id)?;
    }
    validate(&input)?;

    let todo = apply_changes(&state, id, TodoChanges::from(input)).await?;
    Ok(Json(todo))
}

/// DELETE /todos/{id}
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    tracing::info!(todo_id = %id, "Deleting todo");

    if state.store.delete_todo(id).await? {
        tracing::info!(todo_id = %id, "Todo deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!(todo_id = %id, "Todo not found for deletion");
        Err(AppError::Core(CoreError::NotFound {
            entity: TODO_ENTITY,
            id,
        }))
    }
}

/// Run the optimistic update and map its outcome onto the HTTP error set.
async fn apply_changes(state: &AppState, id: DbId, changes: TodoChanges) -> AppResult<TodoItem> {
    tracing::info!(todo_id = %id, "Updating todo");

    let outcome = state.store.update_todo(id, &changes, now()).await?;
    match &outcome {
        UpdateOutcome::Updated(_) => tracing::info!(todo_id = %id, "Todo updated"),
        UpdateOutcome::NotFound => tracing::warn!(todo_id = %id, "Todo not found for update"),
        UpdateOutcome::Conflict => {
            tracing::error!(todo_id = %id, "Concurrency conflict updating todo")
        }
    }
    Ok(outcome.into_result(TODO_ENTITY, id)?)
}

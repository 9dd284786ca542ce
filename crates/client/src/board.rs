//! Local todo list kept in step with the server.
//!
//! [`TodoBoard`] mirrors what a UI holds: the current list, a loading flag
//! and the last fetch error. Mutations go to the server first and are only
//! applied locally once the server has accepted them.

use taskboard_core::ordering::TodoOrder;
use taskboard_core::types::DbId;
use taskboard_db::models::todo::{CreateTodo, PatchTodo, TodoItem};

use crate::api::{ClientError, TodoApi};

pub struct TodoBoard<A: TodoApi> {
    api: A,
    todos: Vec<TodoItem>,
    loading: bool,
    error: Option<String>,
    hydrated: bool,
}

impl<A: TodoApi> TodoBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            todos: Vec::new(),
            loading: false,
            error: None,
            hydrated: false,
        }
    }

    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the most recent failed [`TodoBoard::fetch_all`].
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Seed the board with a server-rendered list. Only the first call has
    /// any effect.
    pub fn hydrate(&mut self, todos: Vec<TodoItem>) {
        if self.hydrated {
            return;
        }
        self.todos = todos;
        self.hydrated = true;
    }

    /// Reload the full list, newest first. Failures are recorded in
    /// [`TodoBoard::error`] and the previous list is kept.
    pub async fn fetch_all(&mut self) {
        self.loading = true;
        self.error = None;

        match self.api.list_todos(TodoOrder::default()).await {
            Ok(todos) => self.todos = todos,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch todos");
                self.error = Some(error_message(&err));
            }
        }

        self.loading = false;
    }

    /// Create a todo and put it at the top of the list.
    pub async fn add(&mut self, title: &str, description: Option<&str>) -> Result<(), ClientError> {
        let input = CreateTodo {
            title: title.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            category_id: None,
        };
        let created = self.api.create_todo(&input).await?;
        self.todos.insert(0, created);
        Ok(())
    }

    /// Patch a todo and swap in the server's copy.
    pub async fn update(&mut self, id: DbId, patch: PatchTodo) -> Result<(), ClientError> {
        let updated = self.api.patch_todo(id, &patch).await?;
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == id) {
            *slot = updated;
        }
        Ok(())
    }

    pub async fn remove(&mut self, id: DbId) -> Result<(), ClientError> {
        self.api.delete_todo(id).await?;
        self.todos.retain(|t| t.id != id);
        Ok(())
    }
}

fn error_message(err: &ClientError) -> String {
    match err {
        ClientError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

//! REST client for the taskboard HTTP endpoints.
//!
//! Wraps the `/todos` and `/categories` resources using [`reqwest`]. Error
//! responses are decoded from the server's `{"error", "code"}` envelope.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use taskboard_core::ordering::TodoOrder;
use taskboard_core::types::DbId;
use taskboard_db::models::category::Category;
use taskboard_db::models::todo::{CreateTodo, PatchTodo, TodoItem, UpdateTodo};

/// Errors from the taskboard REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status} {code}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable code from the error envelope, e.g. `NOT_FOUND`.
        code: String,
        /// Human-readable message from the error envelope.
        message: String,
    },
}

impl ClientError {
    /// HTTP status behind the error: the server's status for
    /// [`ClientError::Api`], or the status reqwest attached to a
    /// [`ClientError::Request`] failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// Error body produced by the server for every failed request.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
    code: String,
}

/// Operations the [`crate::TodoBoard`] needs from a backend.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn list_todos(&self, order: TodoOrder) -> Result<Vec<TodoItem>, ClientError>;
    async fn create_todo(&self, input: &CreateTodo) -> Result<TodoItem, ClientError>;
    async fn patch_todo(&self, id: DbId, input: &PatchTodo) -> Result<TodoItem, ClientError>;
    async fn delete_todo(&self, id: DbId) -> Result<(), ClientError>;
}

/// HTTP client for a single taskboard server.
#[derive(Debug, Clone)]
pub struct TodoClient {
    client: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    /// Create a client for the server at `base_url`, e.g.
    /// `http://localhost:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all todos in the given order.
    pub async fn list_todos(&self, order: TodoOrder) -> Result<Vec<TodoItem>, ClientError> {
        let response = self
            .client
            .get(self.url("/todos"))
            .query(&[
                ("_sort", order.field.to_string()),
                ("_order", order.direction.to_string()),
            ])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch a single todo. A 404 is reported as `Ok(None)`.
    pub async fn get_todo(&self, id: DbId) -> Result<Option<TodoItem>, ClientError> {
        let response = self.client.get(self.todo_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::parse_response(response).await.map(Some)
    }

    /// Create a todo. The server assigns the id and timestamps.
    pub async fn create_todo(&self, input: &CreateTodo) -> Result<TodoItem, ClientError> {
        let response = self
            .client
            .post(self.url("/todos"))
            .json(input)
            .send()
            .await?;

        let todo: TodoItem = Self::parse_response(response).await?;
        tracing::debug!(todo_id = %todo.id, "Created todo");
        Ok(todo)
    }

    /// Replace a todo's mutable fields (`PUT`). The server answers 204, so
    /// nothing is returned.
    pub async fn update_todo(&self, input: &UpdateTodo) -> Result<(), ClientError> {
        let response = self
            .client
            .put(self.todo_url(input.id))
            .json(input)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// Apply a partial update (`PATCH`) and return the updated todo.
    pub async fn patch_todo(&self, id: DbId, input: &PatchTodo) -> Result<TodoItem, ClientError> {
        let response = self
            .client
            .patch(self.todo_url(id))
            .json(input)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn delete_todo(&self, id: DbId) -> Result<(), ClientError> {
        let response = self.client.delete(self.todo_url(id)).send().await?;
        Self::check_status(response).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        let response = self.client.get(self.url("/categories")).send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn todo_url(&self, id: DbId) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    /// Return the response unchanged on success, or decode the error
    /// envelope into [`ClientError::Api`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (envelope.code, envelope.error),
            Err(_) => ("UNKNOWN".to_string(), body),
        };
        tracing::debug!(status = status.as_u16(), %code, "API request failed");

        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TodoApi for TodoClient {
    async fn list_todos(&self, order: TodoOrder) -> Result<Vec<TodoItem>, ClientError> {
        TodoClient::list_todos(self, order).await
    }

    async fn create_todo(&self, input: &CreateTodo) -> Result<TodoItem, ClientError> {
        TodoClient::create_todo(self, input).await
    }

    async fn patch_todo(&self, id: DbId, input: &PatchTodo) -> Result<TodoItem, ClientError> {
        TodoClient::patch_todo(self, id, input).await
    }

    async fn delete_todo(&self, id: DbId) -> Result<(), ClientError> {
        TodoClient::delete_todo(self, id).await
    }
}

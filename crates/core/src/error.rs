use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Path id {path} does not match body id {body}")]
    IdMismatch { path: DbId, body: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store is missing data the service needs to operate (e.g. no
    /// categories have been seeded).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

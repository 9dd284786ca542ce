use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskboard_core::error::CoreError;
use taskboard_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, and adds the extractor rejections so malformed requests get
/// the same `{"error", "code"}` JSON body as every other failure.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request body was not valid JSON for the expected shape.
    #[error("Invalid request body: {0}")]
    Json(#[from] JsonRejection),

    /// A path segment could not be parsed, e.g. an id that is not a UUID.
    #[error("Invalid path: {0}")]
    Path(#[from] PathRejection),

    /// The query string could not be parsed.
    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::IdMismatch { .. } => {
                    (StatusCode::BAD_REQUEST, "ID_MISMATCH", core.to_string())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Configuration(msg) => {
                    tracing::error!(error = %msg, "Service is misconfigured");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIGURATION_ERROR",
                        msg.clone(),
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(StoreError::UnknownCategory(id)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Category {id} does not exist"),
            ),
            AppError::Store(StoreError::Database(err)) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }

            // --- Extractor rejections ---
            AppError::Json(rejection) => {
                rejection_parts(rejection.status(), rejection.body_text())
            }
            AppError::Path(rejection) => {
                rejection_parts(rejection.status(), rejection.body_text())
            }
            AppError::Query(rejection) => {
                rejection_parts(rejection.status(), rejection.body_text())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an extractor rejection by the status axum assigned it.
///
/// A body that is valid JSON but does not fit the DTO (axum's 422) is
/// reported as 400, like any other malformed request.
fn rejection_parts(status: StatusCode, body: String) -> (StatusCode, &'static str, String) {
    match status {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => (status, "UNSUPPORTED_MEDIA_TYPE", body),
        StatusCode::PAYLOAD_TOO_LARGE => (status, "PAYLOAD_TOO_LARGE", body),
        s if s.is_server_error() => {
            tracing::error!(error = %body, "Request extraction failed");
            (s, "INTERNAL_ERROR", INTERNAL_MESSAGE.to_string())
        }
        _ => (StatusCode::BAD_REQUEST, "BAD_REQUEST", body),
    }
}

pub mod api;
pub mod collection;
pub mod persistence;
pub mod reading;

pub use api::ApiError;
pub use collection::{CollectionCause, CollectionFailure, FetchError};
pub use persistence::PersistenceError;
pub use reading::ReadingError;

use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

fn internal_error(kind: &str, error: impl Display) -> (StatusCode, String, Option<String>) {
    let error_id = Uuid::new_v4();
    tracing::error!(error_id = ?error_id, "{}: {}", kind, error);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
        Some(error_id.to_string()),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Extract status code and error message from the specific error type
        let (status, error_message, error_id) = match self {
            ApiError::ReadingError(e) => (e.status_code(), e.to_string(), None),
            ApiError::CollectionError(e) if e.is_fetch() => {
                tracing::warn!(device_code = %e.device_code, "{}", e);
                (e.status_code(), e.to_string(), None)
            }
            ApiError::CollectionError(e) => internal_error("Collection error", e),
            ApiError::PersistenceError(e) => internal_error("Persistence error", e),
            ApiError::InternalError(e) => internal_error("Internal error", e),
        };

        let mut error_obj = json!({
            "code": status.as_u16(),
            "message": error_message
        });

        if let Some(error_id) = error_id {
            error_obj["error_id"] = json!(error_id);
        }

        let body = Json(json!({
            "error": error_obj
        }));

        (status, body).into_response()
    }
}

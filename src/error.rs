use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::admin::upload::UploadError;
use crate::admin::EditorError;
use crate::catalog::CatalogError;
use crate::planner::GENERATION_FAILED;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,


    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage full: {needed} bytes needed, capacity is {capacity}")]
    StorageFull { needed: u64, capacity: u64 },

    #[error("Itinerary generation failed")]
    GenerationFailed,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::StorageFull { needed, capacity } => {
                AppError::StorageFull { needed, capacity }
            }
            CatalogError::Serialization(e) => AppError::Json(e),
            CatalogError::Backend(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::NotEditing => {
                AppError::BadRequest("No product is open for editing".into())
            }
            EditorError::NotFound(_) => AppError::NotFound,
            EditorError::Validation(msg) => AppError::Validation(msg),
            EditorError::Catalog(e) => e.into(),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::StorageFull { .. } => StatusCode::INSUFFICIENT_STORAGE,
            AppError::GenerationFailed => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) | AppError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show in a page or response body.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound => "Not found".to_string(),
            AppError::BadRequest(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::StorageFull { .. } => {
                "Storage full! Try using smaller images or fewer images.".to_string()
            }
            AppError::GenerationFailed => GENERATION_FAILED.to_string(),
            AppError::Json(_) => {
                "Stored catalog data is unreadable, so nothing was saved.".to_string()
            }
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::Json(e) => tracing::error!("JSON error: {}", e),
            AppError::StorageFull { needed, capacity } => {
                tracing::warn!("Storage full: {} of {} bytes", needed, capacity)
            }
            _ => {}
        }

        (self.status(), self.user_message()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::UserId;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Data unavailable: failed to load {0}, please retry later")]
    DataUnavailable(String),

    #[error("User {user_id} does not exist{}", last_user_hint(.last_user_id))]
    UnknownUser {
        user_id: UserId,
        last_user_id: Option<UserId>,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cannot derive a new user id from an empty user registry")]
    EmptyRegistry,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

fn last_user_hint(last_user_id: &Option<UserId>) -> String {
    match last_user_id {
        Some(id) => format!("; the last registered user id is {}", id),
        None => "; no users are registered yet".to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::UnknownUser { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyRegistry => StatusCode::CONFLICT,
            AppError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

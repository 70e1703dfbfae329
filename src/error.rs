use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::workflow::WorkflowError;

#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    Session(tower_sessions::session::Error),
    Workflow(WorkflowError),
    NotFound,
}

fn message(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "message": msg }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => message(StatusCode::NOT_FOUND, "Not found"),
            AppError::Workflow(e) => e.into_response(),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Session(e) => {
                tracing::error!("Session error: {e}");
                message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for WorkflowError {
    fn into_response(self) -> Response {
        match self {
            WorkflowError::NotFound => message(StatusCode::NOT_FOUND, "Study group not found."),
            WorkflowError::NotMember => {
                message(StatusCode::NOT_FOUND, "User was not a member of the study group.")
            }
            WorkflowError::Unauthorized => {
                message(StatusCode::FORBIDDEN, "Only the group manager may perform this action.")
            }
            WorkflowError::DuplicateName => {
                message(StatusCode::BAD_REQUEST, "A study group with this name already exists.")
            }
            WorkflowError::DuplicatePending => {
                message(StatusCode::BAD_REQUEST, "You have already applied to join this group.")
            }
            WorkflowError::AlreadyMember => {
                message(StatusCode::BAD_REQUEST, "User is already a member of this group.")
            }
            WorkflowError::InvalidState => message(
                StatusCode::BAD_REQUEST,
                "The operation is not allowed in the current state.",
            ),
            WorkflowError::ManagerCannotLeave => message(
                StatusCode::BAD_REQUEST,
                "The manager cannot leave the group; dissolve it instead.",
            ),
            WorkflowError::Database(e) => {
                tracing::error!("Database error: {e}");
                message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Session(e)
    }
}

impl From<WorkflowError> for AppError {
    fn from(e: WorkflowError) -> Self {
        AppError::Workflow(e)
    }
}

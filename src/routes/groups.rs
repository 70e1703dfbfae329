use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::auth::{AdminUser, AuthUser};
use crate::error::AppError;
use crate::workflow::{self, WorkflowError};

#[derive(Deserialize)]
pub struct CreateGroupRequest {
    name: String,
    description: Option<String>,
}

#[derive(Deserialize)]
pub struct GroupLookupQuery {
    #[serde(rename = "targetUserId")]
    target_user_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/GetAllStudyGroups", get(get_all_study_groups))
        .route("/GetStudyGroupById/{id}", get(get_study_group_by_id))
        .route("/GetUserRoleInGroup/{id}", get(get_user_role_in_group))
        .route("/GetStudyGroupMembers/{id}", get(get_study_group_members))
        .route("/GetGroupManagers/{id}", get(get_group_managers))
        .route("/GetStudyGroup", get(get_study_group_by_user))
        .route("/CreateStudyGroup", post(create_study_group))
        .route("/ApproveStudyGroup", post(approve_study_group))
        .route("/RejectStudyGroup", post(reject_study_group))
        .route(
            "/ViewCreateStudyGroupRequests",
            get(view_create_study_group_requests),
        )
        .route("/DeleteStudyGroup/{id}", delete(delete_study_group))
}

async fn get_all_study_groups(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let groups = workflow::get_all_study_groups(&state.db).await?;
    Ok(Json(groups))
}

async fn get_study_group_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let group = workflow::get_study_group_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(group))
}

async fn get_user_role_in_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let role = workflow::get_user_role_in_group(&state.db, &id, &user.id).await?;
    match role {
        Some(role) => Ok(Json(role).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "User role not found." })),
        )
            .into_response()),
    }
}

async fn get_study_group_members(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let members = workflow::get_study_group_members(&state.db, &id).await?;
    Ok(Json(members))
}

async fn get_group_managers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let managers = workflow::get_group_managers(&state.db, &id).await?;
    if managers.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No managers found for this study group." })),
        )
            .into_response());
    }
    Ok(Json(managers).into_response())
}

/// Groups the target user belongs to. Looking up another user requires the
/// administrator role; self lookup is always allowed.
async fn get_study_group_by_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<GroupLookupQuery>,
) -> Result<impl IntoResponse, AppError> {
    let target = query.target_user_id.as_deref().unwrap_or(&user.id);
    if target != user.id && !user.is_admin() {
        return Err(WorkflowError::Unauthorized.into());
    }

    let groups = workflow::get_study_groups_by_user(&state.db, target).await?;
    Ok(Json(groups))
}

async fn create_study_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let group = workflow::create_study_group(
        &state.db,
        &user.id,
        body.name.trim(),
        body.description.as_deref(),
    )
    .await?;

    Ok(Json(json!({
        "message": "Study group creation request submitted for approval.",
        "groupId": group.id,
    })))
}

async fn approve_study_group(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(group_id): Json<String>,
) -> Result<impl IntoResponse, AppError> {
    workflow::approve_study_group(&state.db, &group_id).await?;
    Ok(Json(json!({ "message": "Study group has been approved successfully." })))
}

async fn reject_study_group(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(group_id): Json<String>,
) -> Result<impl IntoResponse, AppError> {
    workflow::reject_study_group(&state.db, &group_id).await?;
    Ok(Json(json!({ "message": "Study group has been rejected successfully." })))
}

async fn view_create_study_group_requests(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let requests = workflow::view_create_study_group_requests(&state.db).await?;
    if requests.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No pending study group requests found." })),
        )
            .into_response());
    }
    Ok(Json(requests).into_response())
}

async fn delete_study_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted =
        workflow::delete_study_group(&state.db, &id, &user.id, user.is_admin()).await?;
    if deleted {
        Ok(Json(json!({ "message": "Study group deleted successfully." })).into_response())
    } else {
        Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Error deleting study group or permission denied." })),
        )
            .into_response())
    }
}

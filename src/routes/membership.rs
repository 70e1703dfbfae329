use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::JoinRequestStatus;
use crate::workflow;

#[derive(Deserialize)]
pub struct ApplyToJoinRequest {
    #[serde(rename = "studyGroupId")]
    study_group_id: String,
}

#[derive(Deserialize)]
pub struct GroupActionRequest {
    #[serde(rename = "groupId")]
    group_id: String,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "studyGroupId")]
    study_group_id: String,
    status: JoinRequestStatus,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ApplyToJoin", post(apply_to_join))
        .route("/LeaveStudyGroup", post(leave_study_group))
        .route("/DissolveStudyGroup", post(dissolve_study_group))
        .route("/UpdateApplicationStatus", post(update_application_status))
        .route("/JoinGroup/{id}", post(join_group))
        .route("/GetJoinRequests/{id}", get(get_join_requests))
        .route(
            "/GetPendingJoinRequestsCount/{id}",
            get(get_pending_join_requests_count),
        )
        .route("/GetActivityLogs/{id}", get(get_activity_logs))
}

async fn apply_to_join(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<ApplyToJoinRequest>,
) -> Result<impl IntoResponse, AppError> {
    workflow::apply_to_join(&state.db, &user.id, &body.study_group_id).await?;
    Ok(Json(json!({ "message": "Application submitted successfully." })))
}

async fn leave_study_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<GroupActionRequest>,
) -> Result<impl IntoResponse, AppError> {
    workflow::leave_study_group(&state.db, &user.id, &body.group_id).await?;
    Ok(Json(json!({ "message": "Successfully left the study group." })))
}

async fn dissolve_study_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<GroupActionRequest>,
) -> Result<impl IntoResponse, AppError> {
    workflow::dissolve_study_group(&state.db, &user.id, &body.group_id).await?;
    Ok(Json(json!({ "message": "Study group successfully dissolved." })))
}

/// Resolve a pending join request. The session user must be the group's
/// manager; the body names the applicant.
async fn update_application_status(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    workflow::update_application_status(
        &state.db,
        &actor.id,
        &body.study_group_id,
        &body.user_id,
        body.status,
    )
    .await?;
    Ok(Json(json!({ "message": "Application status updated successfully." })))
}

async fn join_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    workflow::join_group(&state.db, &id, &user.id).await?;
    Ok(Json(json!({ "message": "Joined group successfully." })))
}

async fn get_join_requests(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    workflow::get_study_group_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let requests = workflow::get_join_requests(&state.db, &id).await?;
    Ok(Json(requests))
}

async fn get_pending_join_requests_count(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let count = workflow::get_pending_join_requests_count(&state.db, &id).await?;
    Ok(Json(count))
}

// No group-existence check here: the audit trail outlives a dissolved group.
async fn get_activity_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let logs = workflow::get_activity_logs(&state.db, &id).await?;
    Ok(Json(logs))
}

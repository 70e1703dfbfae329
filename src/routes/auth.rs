use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::AppState;
use crate::auth::{login_user, logout_user};
use crate::error::AppError;
use crate::models::User;

#[derive(Deserialize)]
pub struct LoginRequest {
    invite_code: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE invite_code = ?")
        .bind(&body.invite_code)
        .fetch_optional(&state.db)
        .await?;

    match user {
        Some(user) => {
            let response = Json(json!({ "id": user.id, "name": user.name, "role": user.role }));
            login_user(&session, user).await?;
            Ok(response.into_response())
        }
        None => Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid invite code" })),
        )
            .into_response()),
    }
}

async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    logout_user(&session).await?;
    Ok(Json(json!({ "message": "Logged out." })))
}

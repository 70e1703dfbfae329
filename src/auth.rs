use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::User;

const USER_ID_KEY: &str = "user_id";

/// The authenticated caller, resolved from the session. The workflow engine
/// only ever sees the user id carried here, never credentials.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthError::Unauthenticated)?;

        let user: Option<User> = session.get(USER_ID_KEY).await.ok().flatten();

        user.map(AuthUser).ok_or(AuthError::Unauthenticated)
    }
}

/// An authenticated caller holding the administrator role.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.is_admin() {
            Ok(AdminUser(user))
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

pub enum AuthError {
    Unauthenticated,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AuthError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "User is not authenticated.")
            }
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Administrator role required."),
        };
        (status, Json(json!({ "message": msg }))).into_response()
    }
}

pub async fn login_user(
    session: &Session,
    user: User,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(USER_ID_KEY, user).await
}

pub async fn logout_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

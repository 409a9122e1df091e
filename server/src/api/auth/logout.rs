use crate::api::ErrorResponse;
use crate::auth::{bearer_token, end_session, AuthUser};
use crate::db::DbPool;
use crate::error::AppError;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    // AuthUser already validated the header
    let token = bearer_token(&headers)
        .map_err(|_| AppError::Unauthorized("Missing Authorization header"))?;

    let mut conn = pool.get()?;
    end_session(&mut conn, token)?;
    tracing::info!(user_id = %user.id, "user signed out");

    Ok(StatusCode::NO_CONTENT)
}

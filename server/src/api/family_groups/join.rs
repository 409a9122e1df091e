use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::families::{redeem_invite, JoinedGroup};
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct JoinGroupRequest {
    /// Invite code; surrounding spaces and case are ignored
    pub code: String,
}

#[utoipa::path(
    post,
    path = "/api/family-groups/join",
    tag = "family_groups",
    request_body(content = JoinGroupRequest, example = json!({"code": "K7Q2M9XA"})),
    responses(
        (status = 200, description = "Joined the group as a member", body = JoinedGroup),
        (status = 400, description = "Empty code", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Unknown invite code", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
        (status = 410, description = "Invite code has expired", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn join_group(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<JoinGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let joined = redeem_invite(&mut conn, &request.code, &user, Utc::now())?;
    Ok(Json(joined))
}

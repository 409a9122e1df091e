use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppError;
use crate::families::generate_invite;
use crate::models::GroupId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InviteResponse {
    pub group_id: GroupId,
    pub code: String,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[utoipa::path(
    post,
    path = "/api/family-groups/{id}/invites",
    tag = "family_groups",
    params(
        ("id" = String, Path, description = "Family group ID")
    ),
    responses(
        (status = 201, description = "Invite code created", body = InviteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Caller is not a group admin", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_invite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Path(id): Path<GroupId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let invite = generate_invite(&mut conn, &id, &user, config.invite_ttl(), &mut rand::rng())?;

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            group_id: invite.group_id,
            code: invite.code,
            expiry_date: invite.expiry_date,
        }),
    ))
}

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::families::{group_summary, list_members, GroupSummary, MemberSummary};
use crate::models::GroupId;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupDetailResponse {
    pub group: GroupSummary,
    pub members: Vec<MemberSummary>,
}

#[utoipa::path(
    get,
    path = "/api/family-groups/{id}",
    tag = "family_groups",
    params(
        ("id" = String, Path, description = "Family group ID")
    ),
    responses(
        (status = 200, description = "Group with its members", body = GroupDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_group(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<GroupId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let group = group_summary(&mut conn, &id, &user)?;
    let members = list_members(&mut conn, &id)?;

    Ok(Json(GroupDetailResponse { group, members }))
}

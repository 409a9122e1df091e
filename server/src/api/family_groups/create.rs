use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::families::{self, GroupSummary};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/family-groups",
    tag = "family_groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created with the caller as admin", body = GroupSummary),
        (status = 400, description = "Empty group name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_group(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let group = families::create_group(
        &mut conn,
        &user,
        &request.name,
        request.description.as_deref(),
    )?;
    tracing::info!(group_id = %group.id, "family group created");

    let summary = families::group_summary(&mut conn, &group.id, &user)?;
    Ok((StatusCode::CREATED, Json(summary)))
}

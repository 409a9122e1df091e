use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::families::{self, GroupSummary};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListGroupsParams {
    /// Filters by group name, case-insensitively
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListGroupsResponse {
    pub groups: Vec<GroupSummary>,
}

#[utoipa::path(
    get,
    path = "/api/family-groups",
    tag = "family_groups",
    params(ListGroupsParams),
    responses(
        (status = 200, description = "Groups the caller belongs to, with member and recipe counts", body = ListGroupsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_groups(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListGroupsParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let groups = families::list_groups(&mut conn, &user, params.q.as_deref())?;
    Ok(Json(ListGroupsResponse { groups }))
}

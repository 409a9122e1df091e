use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::families;
use crate::models::GroupId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/family-groups/{id}/membership",
    tag = "family_groups",
    params(
        ("id" = String, Path, description = "Family group ID")
    ),
    responses(
        (status = 204, description = "Left the group; the group is deleted when its last member leaves"),
        (status = 400, description = "Last admin cannot leave while others remain", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn leave_group(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<GroupId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    families::leave_group(&mut conn, &id, &user)?;

    Ok(StatusCode::NO_CONTENT)
}

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::families::group_recipes;
use crate::models::GroupId;
use crate::recipes::RecipeResponse;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/family-groups/{id}/recipes",
    tag = "family_groups",
    params(
        ("id" = String, Path, description = "Family group ID")
    ),
    responses(
        (status = 200, description = "Recipes shared into the group", body = GroupRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_group_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<GroupId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let recipes = group_recipes(&mut conn, &id, &user)?
        .into_iter()
        .map(RecipeResponse::from)
        .collect();

    Ok(Json(GroupRecipesResponse { recipes }))
}

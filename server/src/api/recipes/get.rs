use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::favorites::is_favorite;
use crate::models::RecipeId;
use crate::recipes::{find_visible, RecipeResponse};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub is_owner: bool,
    pub is_favorite: bool,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = RecipeDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not visible", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<RecipeId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let recipe = find_visible(&mut conn, &id, Some(&user))?;
    let is_favorite = is_favorite(&mut conn, &user, &id)?;

    Ok(Json(RecipeDetailResponse {
        is_owner: recipe.user_id == user.id,
        is_favorite,
        recipe: RecipeResponse::from(recipe),
    }))
}

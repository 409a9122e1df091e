use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::favorites;
use crate::models::RecipeId;
use crate::recipes::find_visible;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteResponse {
    pub recipe_id: RecipeId,
    pub favorite: bool,
}

fn respond(recipe_id: RecipeId, favorite: bool) -> Json<FavoriteResponse> {
    Json(FavoriteResponse {
        recipe_id,
        favorite,
    })
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/favorite",
    tag = "favorites",
    params(("id" = String, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Whether the recipe is a favorite", body = FavoriteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<RecipeId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    find_visible(&mut conn, &id, Some(&user))?;
    let favorite = favorites::is_favorite(&mut conn, &user, &id)?;
    Ok(respond(id, favorite))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "favorites",
    params(("id" = String, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Favorite flipped; body holds the new state", body = FavoriteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<RecipeId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let favorite = favorites::toggle_favorite(&mut conn, &user, &id)?;
    Ok(respond(id, favorite))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}/favorite",
    tag = "favorites",
    params(("id" = String, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe is a favorite", body = FavoriteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<RecipeId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    favorites::set_favorite(&mut conn, &user, &id)?;
    Ok(respond(id, true))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "favorites",
    params(("id" = String, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe is not a favorite", body = FavoriteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unset_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<RecipeId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    favorites::unset_favorite(&mut conn, &user, &id)?;
    Ok(respond(id, false))
}

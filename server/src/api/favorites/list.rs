use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::favorites;
use crate::recipes::RecipeResponse;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoritesResponse {
    pub recipes: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "favorites",
    responses(
        (status = 200, description = "Favorite recipes, most recently added first", body = FavoritesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_favorites(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let recipes = favorites::list_favorites(&mut conn, &user)?
        .into_iter()
        .map(RecipeResponse::from)
        .collect();

    Ok(Json(FavoritesResponse { recipes }))
}

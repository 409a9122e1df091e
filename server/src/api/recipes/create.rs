use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::recipes::{self, RecipeInput, RecipeResponse};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeInput,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a member of the target family group", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<RecipeInput>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let recipe = recipes::create_recipe(&mut conn, &user, &request)?;
    tracing::info!(recipe_id = %recipe.id, "recipe created");

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}

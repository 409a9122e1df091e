use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::recipes::{list_for_user, RecipeFilter, RecipeResponse};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Matches title or description, case-insensitively
    pub q: Option<String>,
    /// Category name; "Tous" or absent means all
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "The caller's recipe library, most recently updated first", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_recipes(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let filter = RecipeFilter {
        q: params.q,
        category: params.category,
    };
    let recipes = list_for_user(&mut conn, &user, &filter)?
        .into_iter()
        .map(RecipeResponse::from)
        .collect();

    Ok(Json(ListRecipesResponse { recipes }))
}

use crate::db::DbPool;
use crate::error::AppError;
use crate::recipes::{explore, RecipeFilter, RecipeResponse};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExploreParams {
    /// Matches title or description, case-insensitively
    pub q: Option<String>,
    /// Category name; "Tous" or absent means all
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExploreResponse {
    pub recipes: Vec<RecipeResponse>,
}

#[utoipa::path(
    get,
    path = "/api/explorer",
    tag = "recipes",
    params(ExploreParams),
    responses(
        (status = 200, description = "Public recipes shared by the community", body = ExploreResponse)
    )
)]
pub async fn explore_recipes(
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ExploreParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let filter = RecipeFilter {
        q: params.q,
        category: params.category,
    };
    let recipes = explore(&mut conn, &filter)?
        .into_iter()
        .map(RecipeResponse::from)
        .collect();

    Ok(Json(ExploreResponse { recipes }))
}

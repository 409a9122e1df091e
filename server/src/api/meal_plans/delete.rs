use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::MealPlanId;
use crate::planning::delete_meal;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/meal-plans/{id}",
    tag = "meal_plans",
    params(
        ("id" = String, Path, description = "Meal plan ID")
    ),
    responses(
        (status = 204, description = "Meal plan deleted"),
        (status = 404, description = "Meal plan not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_meal_plan(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<MealPlanId>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    delete_meal(&mut conn, &id, &user)?;

    Ok(StatusCode::NO_CONTENT)
}

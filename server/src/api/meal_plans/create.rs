use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::RecipeId;
use crate::planning::{add_meal, MealSelection, MealType, PlannedMeal};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Either `recipe_id` or `custom_meal` must be set. When both are, the
/// recipe is kept.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMealPlanRequest {
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: Option<RecipeId>,
    pub custom_meal: Option<String>,
    pub notes: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/meal-plans",
    tag = "meal_plans",
    request_body = CreateMealPlanRequest,
    responses(
        (status = 201, description = "Meal planned", body = PlannedMeal),
        (status = 400, description = "Neither a recipe nor a custom meal", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Slot already has a meal", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_meal_plan(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateMealPlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let selection = MealSelection::from_parts(request.recipe_id, request.custom_meal.as_deref())?;

    let mut conn = pool.get()?;
    let planned = add_meal(
        &mut conn,
        &user,
        request.meal_date,
        request.meal_type,
        selection,
        request.notes.as_deref(),
    )?;

    Ok((StatusCode::CREATED, Json(planned)))
}

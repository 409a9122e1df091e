pub mod create;
pub mod delete;
pub mod list;

use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/meal-plans endpoints (mounted at /api/meal-plans)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_meal_plans).post(create::create_meal_plan),
        )
        .route("/{id}", delete(delete::delete_meal_plan))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_meal_plans,
        create::create_meal_plan,
        delete::delete_meal_plan
    ),
    components(schemas(
        crate::planning::MealType,
        crate::planning::PlannedMeal,
        crate::planning::GridCell,
        crate::planning::GridDay,
        crate::planning::WeekView,
        create::CreateMealPlanRequest,
    ))
)]
pub struct ApiDoc;

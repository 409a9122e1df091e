use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::planning::{list_week, WeekView};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMealPlansParams {
    /// Any date in the wanted week, format: YYYY-MM-DD. Defaults to today.
    pub week_of: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/meal-plans",
    tag = "meal_plans",
    params(ListMealPlansParams),
    responses(
        (status = 200, description = "Monday-to-Sunday grid of planned meals", body = WeekView),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_meal_plans(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListMealPlansParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let anchor = params
        .week_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let grid = list_week(&mut conn, &user, anchor)?;

    Ok(Json(grid.view()))
}

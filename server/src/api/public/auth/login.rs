use crate::api::ErrorResponse;
use crate::auth::{authenticate, create_session};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppError;
use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"username": "marie", "password": "tarte-tatin"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let user = authenticate(&mut conn, &req.username, &req.password)?;
    let token = create_session(&mut conn, &user.id, config.session_ttl())?;

    Ok(Json(LoginResponse { token }))
}

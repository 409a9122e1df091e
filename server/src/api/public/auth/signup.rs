use crate::api::ErrorResponse;
use crate::auth::{create_session, register_user};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::UserId;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub user_id: UserId,
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body(content = SignupRequest, example = json!({"username": "marie", "password": "tarte-tatin"})),
    responses(
        (status = 201, description = "User created and signed in", body = SignupResponse),
        (status = 400, description = "Empty username or password too short", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.get()?;

    let user = register_user(&mut conn, &req.username, &req.password)?;
    let token = create_session(&mut conn, &user.id, config.session_ttl())?;
    tracing::info!(user_id = %user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_id: user.id,
            token,
        }),
    ))
}

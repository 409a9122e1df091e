pub mod auth;
pub mod explorer;
pub mod testing;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/test/unauthed-ping",
            get(testing::unauthed_ping::unauthed_ping),
        )
        .route("/api/auth/signup", post(auth::signup::signup))
        .route("/api/auth/login", post(auth::login::login))
        .route("/api/explorer", get(explorer::explore_recipes))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login::login,
        auth::signup::signup,
        testing::unauthed_ping::unauthed_ping,
        explorer::explore_recipes,
    ),
    components(schemas(
        auth::login::LoginRequest,
        auth::login::LoginResponse,
        auth::signup::SignupRequest,
        auth::signup::SignupResponse,
        testing::unauthed_ping::UnauthedPingResponse,
        explorer::ExploreResponse,
    ))
)]
pub struct ApiDoc;

pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/favorites endpoints (mounted at /api/favorites)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list_favorites))
}

#[derive(OpenApi)]
#[openapi(paths(list::list_favorites), components(schemas(list::FavoritesResponse)))]
pub struct ApiDoc;

pub mod create;
pub mod delete;
pub mod favorite;
pub mod get;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/{id}/favorite",
            get(favorite::get_favorite)
                .post(favorite::toggle_favorite)
                .put(favorite::set_favorite)
                .delete(favorite::unset_favorite),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        favorite::get_favorite,
        favorite::toggle_favorite,
        favorite::set_favorite,
        favorite::unset_favorite,
    ),
    components(schemas(
        crate::recipes::RecipeInput,
        crate::recipes::RecipeResponse,
        list::ListRecipesResponse,
        get::RecipeDetailResponse,
        favorite::FavoriteResponse,
    ))
)]
pub struct ApiDoc;

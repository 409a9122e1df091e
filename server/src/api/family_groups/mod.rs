pub mod create;
pub mod get;
pub mod invite;
pub mod join;
pub mod leave;
pub mod list;
pub mod recipes;

use crate::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/family-groups endpoints (mounted at /api/family-groups)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_groups).post(create::create_group))
        .route("/join", post(join::join_group))
        .route("/{id}", get(get::get_group))
        .route("/{id}/invites", post(invite::create_invite))
        .route("/{id}/recipes", get(recipes::list_group_recipes))
        .route("/{id}/membership", delete(leave::leave_group))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_groups,
        create::create_group,
        join::join_group,
        get::get_group,
        invite::create_invite,
        recipes::list_group_recipes,
        leave::leave_group,
    ),
    components(schemas(
        crate::families::GroupSummary,
        crate::families::MemberSummary,
        crate::families::JoinedGroup,
        list::ListGroupsResponse,
        create::CreateGroupRequest,
        join::JoinGroupRequest,
        get::GroupDetailResponse,
        invite::InviteResponse,
        recipes::GroupRecipesResponse,
    ))
)]
pub struct ApiDoc;

//! HTTP router: every route, the access-token layer and tracing.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, middleware, state::AppState};

pub fn build_router(state: AppState) -> Router {
    // Routes behind the optional access token
    let api_routes = Router::new()
        // Platforms
        .route(
            "/api/v1/platforms",
            get(handlers::platforms::list_platforms).post(handlers::platforms::create_platform),
        )
        .route(
            "/api/v1/platforms/{id}",
            delete(handlers::platforms::delete_platform),
        )
        // Games
        .route(
            "/api/v1/games",
            get(handlers::games::list_games).post(handlers::games::create_game),
        )
        .route("/api/v1/games/import", post(handlers::games::import_game))
        .route(
            "/api/v1/games/{id}",
            get(handlers::games::get_game)
                .patch(handlers::games::update_game)
                .delete(handlers::games::delete_game),
        )
        .route(
            "/api/v1/games/{id}/metadata/refresh",
            post(handlers::games::refresh_metadata),
        )
        .route(
            "/api/v1/games/{id}/tags/{tag_id}",
            put(handlers::games::add_tag).delete(handlers::games::remove_tag),
        )
        .route(
            "/api/v1/games/{id}/friends",
            get(handlers::games::list_owners),
        )
        // Tags
        .route(
            "/api/v1/tags",
            get(handlers::tags::list_tags).post(handlers::tags::create_tag),
        )
        .route(
            "/api/v1/tags/{id}",
            patch(handlers::tags::update_tag).delete(handlers::tags::delete_tag),
        )
        // Friends
        .route(
            "/api/v1/friends",
            get(handlers::friends::list_friends).post(handlers::friends::create_friend),
        )
        .route(
            "/api/v1/friends/{id}",
            delete(handlers::friends::delete_friend),
        )
        .route(
            "/api/v1/friends/{id}/games",
            get(handlers::friends::list_owned_games),
        )
        .route(
            "/api/v1/friends/{id}/games/{game_id}",
            put(handlers::friends::add_owned_game).delete(handlers::friends::remove_owned_game),
        )
        // Shortlist
        .route(
            "/api/v1/shortlist",
            get(handlers::shortlist::list_shortlist).post(handlers::shortlist::add_to_shortlist),
        )
        .route(
            "/api/v1/shortlist/{game_id}",
            delete(handlers::shortlist::remove_from_shortlist),
        )
        .route(
            "/api/v1/shortlist/{game_id}/position",
            put(handlers::shortlist::move_in_shortlist),
        )
        // Metadata
        .route("/api/v1/metadata/search", get(handlers::metadata::search))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no token required)
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        // GUI front ends run in webviews on other origins
        .layer(CorsLayer::permissive())
        .with_state(state)
}

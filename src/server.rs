//! HTTP routing

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::profile_avatar_handler::{profile_avatar_handler, AppState};

pub const PROFILE_AVATAR_PATH: &str = "/api/profile";

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(PROFILE_AVATAR_PATH, get(profile_avatar_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

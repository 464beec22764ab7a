pub mod health;

use axum::{
    http::{header, Method},
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::generation::handlers;
use crate::state::AppState;

fn generate_route() -> MethodRouter<AppState> {
    post(handlers::handle_generate).fallback(handlers::handle_method_not_allowed)
}

/// Public, unauthenticated endpoint: any origin may call it.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate", generate_route())
        // Path the browser front end posts to
        .route("/api/generate", generate_route())
        .layer(cors_layer())
        .with_state(state)
}

//! HTTP server.
//!
//! Axum router exposing the scan API, a health probe, and a small
//! embedded frontend. CORS is open for GET so the page can be hosted
//! elsewhere during development.

pub mod routes;

use axum::{
    http::Method,
    response::Html,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub use routes::{AppState, SharedState};

/// Build the application router with all routes and middleware.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/jogos", get(routes::get_jogos))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Serve the embedded frontend.
async fn index() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::{handlers, AppState};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/health", get(handlers::health_check))
        .route(
            "/api/identities/:address",
            get(handlers::get_identity).post(handlers::resolve_identity),
        )
        .route("/api/identities/:address/mint", post(handlers::mint_identity))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod health;
pub mod objects;
pub mod readings;
pub mod upload;

use axum::Router;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

fn cors_layer() -> CorsLayer {
    // Permissive on purpose; the API has no cookie-based auth to protect.
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(86_400))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(health::router())
                .merge(objects::router())
                .merge(readings::router())
                .merge(upload::router())
                .merge(crate::openapi::router()),
        )
        .layer(cors_layer())
        .with_state(state)
}

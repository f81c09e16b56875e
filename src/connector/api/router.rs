use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};

use super::container::Container;
use super::controller::{chat_controller, health_controller};
use crate::domain::{CorsConfig, CorsOrigins};

pub type AppState = Arc<Container>;

/// Build the full application router: the health probe, the chat endpoint,
/// and the CORS layer derived from the resolved configuration.
pub fn create_router(container: Arc<Container>) -> Router {
    let cors = build_cors_layer(&container.config().cors);

    Router::new()
        .route("/health", get(health_controller::health))
        .route("/api/chat", post(chat_controller::chat))
        .layer(cors)
        .with_state(container)
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match &config.origins {
        // Credentials are already forced off for the wildcard, so the fully
        // permissive layer is valid here.
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(origins) => {
            let allowed: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            // Mirrored methods/headers instead of wildcards: wildcards cannot
            // be combined with credentialed responses.
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(config.allow_credentials)
        }
    }
}

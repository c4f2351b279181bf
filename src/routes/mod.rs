use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::CatalogStore,
    middleware::request_id::{make_span, request_id_middleware},
    services::providers::MetadataProvider,
};

pub mod ingest;
pub mod movies;
pub mod ratings;
pub mod recommendations;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub provider: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { catalog, provider }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // Layers wrap bottom-up: the request-id middleware is added last so it
    // runs first and the trace span can pick the id up from extensions.
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(movies::list))
        .route("/movies/:id", get(movies::get))
        .route("/movies/search/:query", get(movies::search))
        .route("/movies/genre/:genre", get(movies::by_genre))
        .route("/movies/trending/now", get(movies::trending))
        .route("/movies/:id/recommendations", get(movies::similar))
        .route("/ratings", post(ratings::create))
        .route("/ratings/my-ratings", get(ratings::my_ratings))
        .route("/ratings/:id", delete(ratings::remove))
        .route("/recommendations/for-me", get(recommendations::for_me))
        .route("/recommendations/popular", get(recommendations::popular))
        .route("/ingest/popular", post(ingest::sync_popular))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

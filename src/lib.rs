pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
pub mod storage;
pub mod store;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::{AdminIdentity, Secret};
use services::upload::UploadPipeline;
use store::ListingStore;

/// Shared state handed to every handler.
pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub uploads: UploadPipeline,
    pub jwt_secret: Secret,
    pub admin: AdminIdentity,
}

/// Build the HTTP application: routes, CORS and request tracing.
pub fn build_app(state: Arc<AppState>) -> Router {
    routes::build_routes()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod auth;
pub mod health;
pub mod leads;
pub mod posts;
pub mod properties;

use axum::Router;
use std::sync::Arc;

use crate::AppState;

/// Build all routes for the API
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(leads::routes())
        .merge(properties::routes())
        .merge(posts::routes())
}

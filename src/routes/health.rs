//! Liveness and database connectivity checks

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::AppState;
use crate::services::error::{ApiError, LogErr};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health))
        .route("/api/test-db", get(test_db))
}

async fn health() -> Json<Value> {
    Json(json!({ "message": "Estates backend is running" }))
}

/// GET /api/test-db - Round-trip to the database
async fn test_db(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let now = state.store.ping().await.log_500("Database check error")?;

    Ok(Json(json!({
        "success": true,
        "message": "Connected",
        "result": [{ "now": now }],
    })))
}

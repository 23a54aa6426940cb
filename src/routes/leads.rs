//! Lead capture endpoints (/api/leads)

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::Serialize;
use std::sync::Arc;

use super::auth::AdminSession;
use crate::AppState;
use crate::models::{Lead, NewLead};
use crate::services::error::{ApiError, LogErr};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/leads", post(create_lead).get(list_leads))
}

#[derive(Serialize)]
struct CreateLeadResponse {
    success: bool,
    lead: Lead,
}

/// POST /api/leads - Public contact form
async fn create_lead(
    State(state): State<Arc<AppState>>,
    req: Result<Json<NewLead>, JsonRejection>,
) -> Result<Json<CreateLeadResponse>, ApiError> {
    let Json(req) = req.log_400("Invalid lead body")?;
    let lead = state
        .store
        .create_lead(req)
        .await
        .log_500("Create lead error")?;

    tracing::info!(lead_id = lead.id, "Lead created");
    Ok(Json(CreateLeadResponse {
        success: true,
        lead,
    }))
}

/// GET /api/leads - All leads, newest first (admin only)
async fn list_leads(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let leads = state.store.list_leads().await.log_500("List leads error")?;
    Ok(Json(leads))
}

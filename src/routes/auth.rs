//! Admin login and the bearer-token gate for protected routes

use axum::{
    Json, Router,
    extract::{FromRequestParts, State, rejection::JsonRejection},
    http::{header::AUTHORIZATION, request::Parts},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;
use crate::services::error::ApiError;
use crate::services::session::{self, Claims, SessionError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/admin/login", post(login))
}

// ============================================================================
// Auth Extractor - validates the bearer token and exposes its claims
// ============================================================================

/// Extractor for admin-only routes.
///
/// Rejects with a bare 401 when no token is sent and a bare 403 when the token does not
/// verify, so the handler body only runs for a valid session.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

/// The token is the second space-separated segment of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(' ').nth(1))
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthenticated)?;

        let claims =
            session::validate_access_token(token, state.jwt_secret.as_bytes()).map_err(|e| {
                tracing::debug!(error = %e, "Bearer token rejected");
                ApiError::Forbidden
            })?;

        Ok(AdminSession(claims))
    }
}

// ============================================================================
// Login
// ============================================================================

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    token: String,
}

/// POST /api/admin/login - Exchange the admin credentials for a 24 hour token
async fn login(
    State(state): State<Arc<AppState>>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    // A body without both credentials can never match the admin identity.
    let Json(req) = req.map_err(|e| {
        tracing::warn!(error = %e, "Admin login with unreadable body");
        ApiError::InvalidCredentials
    })?;
    let token = session::login(
        &state.admin,
        &req.email,
        &req.password,
        state.jwt_secret.as_bytes(),
    )
    .map_err(|e| match e {
        SessionError::InvalidCredentials => {
            tracing::warn!(email = %req.email, "Admin login failed");
            ApiError::InvalidCredentials
        }
        other => {
            tracing::error!(error = %other, "Failed to issue admin token");
            ApiError::Internal(other.to_string())
        }
    })?;

    tracing::info!(email = %req.email, "Admin logged in");
    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}

//! Property listing endpoints (/api/properties)

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, rejection::PathRejection},
    http::StatusCode,
    routing::{delete, get},
};
use serde::Serialize;
use std::sync::Arc;

use super::auth::AdminSession;
use crate::AppState;
use crate::constants::{
    DEFAULT_PROPERTY_STATUS, DEFAULT_PROPERTY_TYPE, MAX_MULTIPART_BODY_SIZE, MAX_PROPERTY_IMAGES,
};
use crate::models::{NewProperty, Property};
use crate::services::error::{ApiError, LogErr};
use crate::services::upload::UploadRules;

const PROPERTY_UPLOADS: UploadRules = UploadRules {
    field: "images",
    max_files: MAX_PROPERTY_IMAGES,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/properties",
            get(list_properties)
                .post(create_property)
                .layer(DefaultBodyLimit::max(MAX_MULTIPART_BODY_SIZE)),
        )
        .route("/api/properties/{id}", delete(delete_property))
}

#[derive(Serialize)]
struct CreatePropertyResponse {
    success: bool,
    property: Property,
}

#[derive(Serialize)]
struct DeletePropertyResponse {
    success: bool,
    message: &'static str,
}

/// POST /api/properties - Create a listing from a multipart form with up to 10 `images`
async fn create_property(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePropertyResponse>), ApiError> {
    let form = state.uploads.process(multipart, PROPERTY_UPLOADS).await?;

    let title = form
        .text("title")
        .ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;
    let location = form
        .text("location")
        .ok_or_else(|| ApiError::BadRequest("location is required".to_string()))?;

    let new_property = NewProperty {
        title,
        location,
        property_type: form
            .text("type")
            .unwrap_or_else(|| DEFAULT_PROPERTY_TYPE.to_string()),
        description: form.text("description"),
        status: form
            .text("status")
            .unwrap_or_else(|| DEFAULT_PROPERTY_STATUS.to_string()),
        images: form.locations,
    };

    let property = state
        .store
        .create_property(new_property)
        .await
        .log_500("Create property error")?;

    tracing::info!(
        property_id = property.id,
        images = property.images.len(),
        "Property created"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatePropertyResponse {
            success: true,
            property,
        }),
    ))
}

/// GET /api/properties - All listings, newest first
async fn list_properties(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let properties = state
        .store
        .list_properties()
        .await
        .log_500("List properties error")?;
    Ok(Json(properties))
}

/// DELETE /api/properties/:id
async fn delete_property(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    property_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeletePropertyResponse>, ApiError> {
    let Path(property_id) = property_id.log_400("Invalid property id")?;
    state
        .store
        .delete_property(property_id)
        .await
        .log_500("Delete property error")?;

    tracing::info!(property_id, "Property deleted");
    Ok(Json(DeletePropertyResponse {
        success: true,
        message: "Property deleted successfully",
    }))
}

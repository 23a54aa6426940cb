//! Blog endpoints (/api/posts)

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, rejection::PathRejection},
    routing::get,
};
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;

use super::auth::AdminSession;
use crate::AppState;
use crate::constants::MAX_MULTIPART_BODY_SIZE;
use crate::models::{BlogPost, NewBlogPost};
use crate::services::error::{ApiError, LogErr};
use crate::services::upload::UploadRules;

const POST_UPLOADS: UploadRules = UploadRules {
    field: "image",
    max_files: 1,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/posts",
            get(list_posts)
                .post(create_post)
                .layer(DefaultBodyLimit::max(MAX_MULTIPART_BODY_SIZE)),
        )
        .route("/api/posts/{id}", get(get_post).delete(delete_post))
}

#[derive(Serialize)]
struct CreatePostResponse {
    success: bool,
    post: BlogPost,
}

#[derive(Serialize)]
struct DeletePostResponse {
    success: bool,
}

/// Today's date as `M/D/YYYY`.
fn default_post_date() -> String {
    Local::now().format("%-m/%-d/%Y").to_string()
}

/// GET /api/posts - All posts, newest first
async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let posts = state.store.list_posts().await.log_500("List posts error")?;
    Ok(Json(posts))
}

/// GET /api/posts/:id
async fn get_post(
    State(state): State<Arc<AppState>>,
    post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BlogPost>, ApiError> {
    let Path(post_id) = post_id.log_400("Invalid post id")?;
    state
        .store
        .get_post(post_id)
        .await
        .log_500("Get post error")?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

/// POST /api/posts - Create a post from a multipart form with an optional cover `image`
async fn create_post(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    multipart: Multipart,
) -> Result<Json<CreatePostResponse>, ApiError> {
    let mut form = state.uploads.process(multipart, POST_UPLOADS).await?;

    let title = form
        .text("title")
        .ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;
    let content = form
        .text("content")
        .ok_or_else(|| ApiError::BadRequest("content is required".to_string()))?;

    let new_post = NewBlogPost {
        title,
        category: form.text("category"),
        excerpt: form.text("excerpt"),
        content,
        date: form.text("date").unwrap_or_else(default_post_date),
        image: form.locations.pop().unwrap_or_default(),
    };

    let post = state
        .store
        .create_post(new_post)
        .await
        .log_500("Create post error")?;

    tracing::info!(post_id = post.id, "Post created");
    Ok(Json(CreatePostResponse {
        success: true,
        post,
    }))
}

/// DELETE /api/posts/:id
async fn delete_post(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    post_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeletePostResponse>, ApiError> {
    let Path(post_id) = post_id.log_400("Invalid post id")?;
    state
        .store
        .delete_post(post_id)
        .await
        .log_500("Delete post error")?;

    tracing::info!(post_id, "Post deleted");
    Ok(Json(DeletePostResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_date_has_no_zero_padding() {
        let date = default_post_date();
        let parts: Vec<&str> = date.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert!(!parts[0].starts_with('0'));
        assert!(!parts[1].starts_with('0'));
        assert_eq!(parts[2].len(), 4);
    }
}

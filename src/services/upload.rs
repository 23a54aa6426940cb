//! Media upload pipeline for multipart listing and blog forms.
//!
//! Each file part is filtered by content type, written to the blob store under a freshly
//! generated key, and replaced by its location URL. Parts that are not images or videos, or
//! that exceed the size ceiling, are dropped without telling the caller.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use bytes::BytesMut;
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::constants::{MAX_UPLOAD_PART_SIZE, OBJECT_KEY_SUFFIX_RANGE, UPLOAD_KEY_PREFIX};
use crate::services::error::ApiError;
use crate::storage::{BlobStore, BlobStoreError, ObjectMetadata};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Multipart(#[from] MultipartError),
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),
    #[error("Too many files for field {field} (max {max})")]
    TooManyFiles { field: &'static str, max: usize },
    #[error("{0}")]
    Store(#[from] BlobStoreError),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Store(e) => {
                tracing::error!(error = %e, "Blob store write failed");
                ApiError::Internal(e.to_string())
            }
            other => {
                tracing::warn!(error = %other, "Rejected multipart upload");
                ApiError::BadRequest(other.to_string())
            }
        }
    }
}

/// Which file field an endpoint accepts and how many files it takes.
#[derive(Debug, Clone, Copy)]
pub struct UploadRules {
    pub field: &'static str,
    pub max_files: usize,
}

/// Result of running a multipart form through the pipeline.
#[derive(Debug, Default)]
pub struct UploadedForm {
    /// Non-file form fields
    pub fields: HashMap<String, String>,
    /// Locations of the accepted files, in the order their parts arrived
    pub locations: Vec<String>,
}

impl UploadedForm {
    /// A trimmed, non-empty text field.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Per-file record built for every accepted part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    pub key: String,
    pub content_type: String,
    pub max_size: usize,
}

impl UploadDescriptor {
    pub fn new(original_name: &str, content_type: &str) -> Self {
        Self {
            key: generate_object_key(original_name),
            content_type: content_type.to_string(),
            max_size: MAX_UPLOAD_PART_SIZE,
        }
    }
}

/// Only images and videos make it to the blob store.
pub fn is_accepted_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type.starts_with("video/")
}

/// Extension of the file name's last path segment, including the dot, case preserved.
/// Leading dots are not an extension, so `.env` has none but `..env` has `.env`.
pub fn file_extension(file_name: &str) -> &str {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) if idx > 0 && !base.chars().all(|c| c == '.') => &base[idx..],
        _ => "",
    }
}

/// `properties/<millis>-<suffix><ext>`
pub fn object_key(original_name: &str, timestamp_ms: i64, suffix: u32) -> String {
    format!(
        "{}{}-{}{}",
        UPLOAD_KEY_PREFIX,
        timestamp_ms,
        suffix,
        file_extension(original_name)
    )
}

/// Build a key from the current time and a random suffix in `[0, 1e9)`.
pub fn generate_object_key(original_name: &str) -> String {
    let suffix = rand::rng().random_range(0..OBJECT_KEY_SUFFIX_RANGE);
    object_key(original_name, Utc::now().timestamp_millis(), suffix)
}

#[derive(Debug, Clone)]
pub struct UploadPipeline {
    store: Arc<dyn BlobStore>,
    max_part_size: usize,
}

impl UploadPipeline {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            max_part_size: MAX_UPLOAD_PART_SIZE,
        }
    }

    pub fn with_max_part_size(mut self, max_part_size: usize) -> Self {
        self.max_part_size = max_part_size;
        self
    }

    /// Drain the multipart body, uploading accepted files and collecting text fields.
    ///
    /// Parts are handled one at a time in arrival order, so the file count is only known as
    /// parts arrive. A store failure or a file over the count limit aborts the request, and
    /// files written before it stay in the bucket.
    pub async fn process(
        &self,
        mut multipart: Multipart,
        rules: UploadRules,
    ) -> Result<UploadedForm, UploadError> {
        let mut form = UploadedForm::default();
        let mut file_count = 0usize;

        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            let Some(file_name) = field.file_name().map(str::to_string) else {
                let value = field.text().await?;
                form.fields.insert(name, value);
                continue;
            };

            if name != rules.field {
                return Err(UploadError::UnexpectedField(name));
            }
            file_count += 1;
            if file_count > rules.max_files {
                return Err(UploadError::TooManyFiles {
                    field: rules.field,
                    max: rules.max_files,
                });
            }

            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            if !is_accepted_content_type(&content_type) {
                tracing::debug!(%file_name, %content_type, "Dropping non-media upload");
                continue;
            }

            let descriptor = UploadDescriptor {
                max_size: self.max_part_size,
                ..UploadDescriptor::new(&file_name, &content_type)
            };

            let mut body = BytesMut::new();
            let mut oversized = false;
            while let Some(chunk) = field.chunk().await? {
                if body.len() + chunk.len() > descriptor.max_size {
                    oversized = true;
                    break;
                }
                body.extend_from_slice(&chunk);
            }
            if oversized {
                tracing::debug!(%file_name, max = descriptor.max_size, "Dropping oversized upload");
                continue;
            }

            let metadata = ObjectMetadata::from([("fieldName".to_string(), name)]);
            let location = self
                .store
                .put_object(
                    &descriptor.key,
                    body.freeze(),
                    &descriptor.content_type,
                    &metadata,
                )
                .await?;

            tracing::info!(key = %descriptor.key, %location, "Uploaded media");
            form.locations.push(location);
        }

        Ok(form)
    }
}

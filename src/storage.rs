//! Blob storage for uploaded media.
//!
//! Route handlers never talk to S3 directly: they go through the [`BlobStore`] trait, which the
//! S3 client implements for production and [`InMemoryBlobStore`] implements for tests.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use s3::creds::Credentials;
use s3::{Bucket, Region};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::config::BlobStoreConfig;

/// Characters escaped when an object key is placed in a URL path. `/` is kept.
const KEY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// User metadata attached to a stored object
pub type ObjectMetadata = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("s3 error: {0}")]
    S3(#[from] s3::error::S3Error),
    #[error("s3 credentials error: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),
    #[error("invalid object metadata: {0}")]
    Metadata(String),
}

#[async_trait]
pub trait BlobStore: fmt::Debug + Send + Sync + 'static {
    /// Stores `body` under `key` and returns a publicly resolvable location.
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<String, BlobStoreError>;
}

pub struct S3BlobStore {
    bucket: Box<Bucket>,
}

impl S3BlobStore {
    /// Creates a client bound to the configured bucket.
    ///
    /// Missing credentials or bucket name are not an error here: the client is built with
    /// empty values and every write is rejected by S3 instead.
    pub fn new(config: &BlobStoreConfig) -> Result<Self, BlobStoreError> {
        let credentials = Credentials::new(
            Some(config.access_key.as_ref().map_or("", |k| k.as_str())),
            Some(config.secret_key.as_ref().map_or("", |k| k.as_str())),
            None,
            None,
            None,
        )?;

        let bucket = Bucket::new(
            config.bucket.as_deref().unwrap_or_default(),
            Region::Custom {
                region: config.region.clone(),
                endpoint: match &config.endpoint {
                    Some(endpoint) => endpoint.clone(),
                    None => format!("https://s3.{}.amazonaws.com", config.region),
                },
            },
            credentials,
        )?;

        Ok(Self { bucket })
    }

    /// A copy of the bucket whose requests carry `metadata` as `x-amz-meta-*` headers.
    /// rust-s3 signs extra headers into single-part puts.
    fn bucket_with_metadata(&self, metadata: &ObjectMetadata) -> Result<Bucket, BlobStoreError> {
        Ok(self.bucket.with_extra_headers(metadata_headers(metadata)?)?)
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.bucket.url(),
            utf8_percent_encode(key, KEY_ENCODE_SET)
        )
    }
}

impl fmt::Debug for S3BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3BlobStore")
            .field("bucket", &self.bucket.name())
            .field("endpoint", &self.bucket.host())
            .finish_non_exhaustive()
    }
}

/// Maps user metadata to `x-amz-meta-*` headers.
fn metadata_headers(metadata: &ObjectMetadata) -> Result<HeaderMap, BlobStoreError> {
    metadata
        .iter()
        .map(|(key, value)| {
            let name = format!("x-amz-meta-{}", key.to_ascii_lowercase())
                .parse::<HeaderName>()
                .map_err(|e| BlobStoreError::Metadata(e.to_string()))?;
            let value = value
                .parse::<HeaderValue>()
                .map_err(|e| BlobStoreError::Metadata(e.to_string()))?;
            Ok((name, value))
        })
        .collect()
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[tracing::instrument(level = "debug", skip(self, body, metadata), fields(size = body.len()))]
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<String, BlobStoreError> {
        self.bucket_with_metadata(metadata)?
            .put_object_with_content_type(key, &body, content_type)
            .await?;

        Ok(self.object_url(key))
    }
}

/// An object written to [`InMemoryBlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub metadata: ObjectMetadata,
}

/// Blob store that keeps objects in memory, in write order.
///
/// Clones share the same storage, so tests can hold a handle for inspection while the app
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    objects: Arc<Mutex<Vec<StoredObject>>>,
}

impl InMemoryBlobStore {
    pub const BASE_URL: &'static str = "https://blobs.test";

    pub fn new() -> Self {
        Self::default()
    }

    /// All objects written so far, oldest first.
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<String, BlobStoreError> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(StoredObject {
                key: key.to_string(),
                body,
                content_type: content_type.to_string(),
                metadata: metadata.clone(),
            });
        Ok(format!("{}/{}", Self::BASE_URL, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_becomes_amz_meta_headers() {
        let metadata = ObjectMetadata::from([("fieldName".to_string(), "images".to_string())]);
        let headers = metadata_headers(&metadata).unwrap();
        assert_eq!(headers.get("x-amz-meta-fieldname").unwrap(), "images");
    }

    #[test]
    fn puts_carry_metadata_headers() {
        let store = S3BlobStore::new(&BlobStoreConfig {
            region: "eu-north-1".to_string(),
            bucket: Some("listings".to_string()),
            ..Default::default()
        })
        .unwrap();
        let metadata = ObjectMetadata::from([("fieldName".to_string(), "image".to_string())]);

        let bucket = store.bucket_with_metadata(&metadata).unwrap();

        assert_eq!(
            bucket.extra_headers().get("x-amz-meta-fieldname").unwrap(),
            "image"
        );
        assert_eq!(bucket.name(), "listings");
    }

    #[test]
    fn object_urls_are_virtual_hosted() {
        let store = S3BlobStore::new(&BlobStoreConfig {
            region: "eu-north-1".to_string(),
            bucket: Some("listings".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            store.object_url("properties/1-2 a.jpg"),
            "https://listings.s3.eu-north-1.amazonaws.com/properties/1-2%20a.jpg"
        );
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use bytes::Bytes;
use std::sync::Arc;

use estates_api::config::{AdminIdentity, Secret};
use estates_api::services::upload::UploadPipeline;
use estates_api::storage::{BlobStore, BlobStoreError, InMemoryBlobStore, ObjectMetadata};
use estates_api::store::memory::InMemoryListingStore;
use estates_api::{AppState, build_app};
use s3::error::S3Error;

pub const ADMIN_EMAIL: &str = "admin@estates.test";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const JWT_SECRET: &str = "integration-secret";

const BOUNDARY: &str = "estates-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryListingStore>,
    pub blobs: InMemoryBlobStore,
}

pub fn test_app() -> TestApp {
    test_app_with(|pipeline| pipeline)
}

pub fn test_app_with(configure: impl FnOnce(UploadPipeline) -> UploadPipeline) -> TestApp {
    let blobs = InMemoryBlobStore::new();
    build_test_app(configure(UploadPipeline::new(Arc::new(blobs.clone()))), blobs)
}

/// App whose blob store accepts `accepted` writes and then fails every write after that.
/// `TestApp::blobs` holds the writes that went through.
pub fn test_app_failing_after(accepted: usize) -> TestApp {
    let blobs = InMemoryBlobStore::new();
    let failing = FailingBlobStore {
        written: blobs.clone(),
        accepted,
    };
    build_test_app(UploadPipeline::new(Arc::new(failing)), blobs)
}

fn build_test_app(uploads: UploadPipeline, blobs: InMemoryBlobStore) -> TestApp {
    let store = Arc::new(InMemoryListingStore::new());
    let state = Arc::new(AppState {
        store: store.clone(),
        uploads,
        jwt_secret: Secret::new(JWT_SECRET),
        admin: AdminIdentity {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
    });
    TestApp {
        app: build_app(state),
        store,
        blobs,
    }
}

pub const BLOB_STORE_DOWN: &str = "bucket unreachable";

#[derive(Debug)]
struct FailingBlobStore {
    written: InMemoryBlobStore,
    accepted: usize,
}

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> Result<String, BlobStoreError> {
        if self.written.objects().len() >= self.accepted {
            return Err(BlobStoreError::S3(S3Error::HttpFailWithBody(
                503,
                BLOB_STORE_DOWN.to_string(),
            )));
        }
        self.written
            .put_object(key, body, content_type, metadata)
            .await
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request")
}

pub enum Part {
    Text(&'static str, &'static str),
    File {
        field: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

pub fn file(
    field: &'static str,
    file_name: &'static str,
    content_type: &'static str,
    bytes: &[u8],
) -> Part {
    Part::File {
        field,
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }
}

pub fn multipart_request(uri: &str, token: Option<&str>, parts: Vec<Part>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        field, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", BOUNDARY),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).expect("request")
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use estates_api::config::{BlobStoreStatus, Config};
use estates_api::services::upload::UploadPipeline;
use estates_api::storage::S3BlobStore;
use estates_api::store::postgres::PgListingStore;
use estates_api::{AppState, build_app, observability};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let config = Config::from_env().context("load configuration")?;

    if let BlobStoreStatus::Degraded { missing } = config.blob_store_status() {
        tracing::warn!(
            ?missing,
            "Blob store credentials incomplete; media uploads will fail"
        );
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    let store = PgListingStore::new(pool);
    store.migrate().await.context("run database migrations")?;

    let blobs = S3BlobStore::new(&config.blob).context("create S3 client")?;
    tracing::info!(?blobs, "Blob store configured");

    let state = Arc::new(AppState {
        store: Arc::new(store),
        uploads: UploadPipeline::new(Arc::new(blobs)),
        jwt_secret: config.jwt_secret.clone(),
        admin: config.admin.clone(),
    });

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind to {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "Listening");
    axum::serve(listener, app).await.context("server failed")?;

    Ok(())
}

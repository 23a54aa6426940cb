//! Relational store seam used by the HTTP handlers.
//!
//! Handlers talk to a [`ListingStore`] trait object so the Postgres backend can be swapped for
//! the in-memory one in tests and local development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{BlogPost, Lead, NewBlogPost, NewLead, NewProperty, Property};

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Round-trips to the database and returns its current time.
    async fn ping(&self) -> StoreResult<DateTime<Utc>>;

    async fn create_lead(&self, lead: NewLead) -> StoreResult<Lead>;
    async fn list_leads(&self) -> StoreResult<Vec<Lead>>;

    async fn create_property(&self, property: NewProperty) -> StoreResult<Property>;
    async fn list_properties(&self) -> StoreResult<Vec<Property>>;
    async fn delete_property(&self, property_id: i64) -> StoreResult<()>;

    async fn create_post(&self, post: NewBlogPost) -> StoreResult<BlogPost>;
    async fn get_post(&self, post_id: i64) -> StoreResult<Option<BlogPost>>;
    async fn list_posts(&self) -> StoreResult<Vec<BlogPost>>;
    async fn delete_post(&self, post_id: i64) -> StoreResult<()>;
}

pub(crate) fn property_not_found(property_id: i64) -> StoreError {
    StoreError::NotFound(format!("Property {} does not exist", property_id))
}

pub(crate) fn post_not_found(post_id: i64) -> StoreError {
    StoreError::NotFound(format!("Post {} does not exist", post_id))
}

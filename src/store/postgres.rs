//! Postgres-backed [`ListingStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{ListingStore, StoreResult, post_not_found, property_not_found};
use crate::domain::{leads, posts, properties};
use crate::models::{BlogPost, Lead, NewBlogPost, NewLead, NewProperty, Property};

#[derive(Clone)]
pub struct PgListingStore {
    db: PgPool,
}

impl PgListingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db).await
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn ping(&self) -> StoreResult<DateTime<Utc>> {
        let row: (DateTime<Utc>,) = sqlx::query_as("SELECT NOW()").fetch_one(&self.db).await?;
        Ok(row.0)
    }

    async fn create_lead(&self, lead: NewLead) -> StoreResult<Lead> {
        Ok(leads::insert_lead(&self.db, &lead).await?)
    }

    async fn list_leads(&self) -> StoreResult<Vec<Lead>> {
        Ok(leads::list_leads(&self.db).await?)
    }

    async fn create_property(&self, property: NewProperty) -> StoreResult<Property> {
        Ok(properties::insert_property(&self.db, &property).await?)
    }

    async fn list_properties(&self) -> StoreResult<Vec<Property>> {
        Ok(properties::list_properties(&self.db).await?)
    }

    async fn delete_property(&self, property_id: i64) -> StoreResult<()> {
        if properties::delete_property(&self.db, property_id).await? == 0 {
            return Err(property_not_found(property_id));
        }
        Ok(())
    }

    async fn create_post(&self, post: NewBlogPost) -> StoreResult<BlogPost> {
        Ok(posts::insert_post(&self.db, &post).await?)
    }

    async fn get_post(&self, post_id: i64) -> StoreResult<Option<BlogPost>> {
        Ok(posts::get_post(&self.db, post_id).await?)
    }

    async fn list_posts(&self) -> StoreResult<Vec<BlogPost>> {
        Ok(posts::list_posts(&self.db).await?)
    }

    async fn delete_post(&self, post_id: i64) -> StoreResult<()> {
        if posts::delete_post(&self.db, post_id).await? == 0 {
            return Err(post_not_found(post_id));
        }
        Ok(())
    }
}

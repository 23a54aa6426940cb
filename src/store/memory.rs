//! In-memory implementation of the listing store.
//!
//! Backs the HTTP tests and local runs without Postgres. Nothing is durable: all records are
//! lost when the process exits. Ids are assigned from a single process-wide counter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::{ListingStore, StoreResult, post_not_found, property_not_found};
use crate::models::{BlogPost, Lead, NewBlogPost, NewLead, NewProperty, Property};

#[derive(Default)]
pub struct InMemoryListingStore {
    next_id: AtomicI64,
    leads: RwLock<Vec<Lead>>,
    properties: RwLock<Vec<Property>>,
    posts: RwLock<Vec<BlogPost>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Newest first; ids break ties between rows created in the same instant.
fn newest_first<T: Clone>(rows: &[T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) -> Vec<T> {
    let mut rows = rows.to_vec();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn ping(&self) -> StoreResult<DateTime<Utc>> {
        Ok(Utc::now())
    }

    async fn create_lead(&self, lead: NewLead) -> StoreResult<Lead> {
        let lead = Lead {
            id: self.next_id(),
            name: lead.name,
            phone: lead.phone,
            created_at: Utc::now(),
        };
        self.leads.write().await.push(lead.clone());
        Ok(lead)
    }

    async fn list_leads(&self) -> StoreResult<Vec<Lead>> {
        let leads = self.leads.read().await;
        Ok(newest_first(&leads, |l| (l.created_at, l.id)))
    }

    async fn create_property(&self, property: NewProperty) -> StoreResult<Property> {
        let property = Property {
            id: self.next_id(),
            title: property.title,
            location: property.location,
            property_type: property.property_type,
            description: property.description,
            status: property.status,
            images: property.images,
            created_at: Utc::now(),
        };
        self.properties.write().await.push(property.clone());
        Ok(property)
    }

    async fn list_properties(&self) -> StoreResult<Vec<Property>> {
        let properties = self.properties.read().await;
        Ok(newest_first(&properties, |p| (p.created_at, p.id)))
    }

    async fn delete_property(&self, property_id: i64) -> StoreResult<()> {
        let mut properties = self.properties.write().await;
        let before = properties.len();
        properties.retain(|p| p.id != property_id);
        if properties.len() == before {
            return Err(property_not_found(property_id));
        }
        Ok(())
    }

    async fn create_post(&self, post: NewBlogPost) -> StoreResult<BlogPost> {
        let post = BlogPost {
            id: self.next_id(),
            title: post.title,
            category: post.category,
            excerpt: post.excerpt,
            content: post.content,
            date: post.date,
            image: post.image,
            created_at: Utc::now(),
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, post_id: i64) -> StoreResult<Option<BlogPost>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn list_posts(&self) -> StoreResult<Vec<BlogPost>> {
        let posts = self.posts.read().await;
        Ok(newest_first(&posts, |p| (p.created_at, p.id)))
    }

    async fn delete_post(&self, post_id: i64) -> StoreResult<()> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| p.id != post_id);
        if posts.len() == before {
            return Err(post_not_found(post_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    fn new_property(title: &str) -> NewProperty {
        NewProperty {
            title: title.to_string(),
            location: "Dubai Marina".to_string(),
            property_type: "Villa".to_string(),
            description: None,
            status: "For Sale".to_string(),
            images: vec![],
        }
    }

    #[tokio::test]
    async fn lists_properties_newest_first() {
        let store = InMemoryListingStore::new();
        store.create_property(new_property("first")).await.unwrap();
        store.create_property(new_property("second")).await.unwrap();

        let titles: Vec<String> = store
            .list_properties()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn deleting_missing_rows_reports_not_found() {
        let store = InMemoryListingStore::new();
        let err = store.delete_post(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(err.to_string(), "Post 42 does not exist");

        let created = store.create_property(new_property("villa")).await.unwrap();
        store.delete_property(created.id).await.unwrap();
        assert!(store.list_properties().await.unwrap().is_empty());
        assert!(store.delete_property(created.id).await.is_err());
    }
}

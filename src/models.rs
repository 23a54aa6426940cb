//! Records persisted by the listing store and returned over HTTP

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact request left by a site visitor
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
}

/// A real-estate listing with its ordered image URLs
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub title: String,
    pub location: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: Option<String>,
    pub status: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProperty {
    pub title: String,
    pub location: String,
    pub property_type: String,
    pub description: Option<String>,
    pub status: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub date: String,
    /// Location of the cover image, empty when the post has none
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: String,
    pub category: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub date: String,
    pub image: String,
}

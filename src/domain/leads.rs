//! Lead domain - DB queries for leads
//!
//! All functions use the generic Executor pattern, allowing them to work with
//! both `&PgPool` (for standalone queries) and `&mut PgConnection` (for transactions).

use sqlx::{Executor, Postgres};

use crate::models::{Lead, NewLead};

/// Insert a lead and return the stored row
pub async fn insert_lead<'e, E>(executor: E, lead: &NewLead) -> Result<Lead, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO leads (name, phone)
        VALUES ($1, $2)
        RETURNING id, name, phone, created_at
        "#,
    )
    .bind(&lead.name)
    .bind(&lead.phone)
    .fetch_one(executor)
    .await
}

/// List all leads, newest first
pub async fn list_leads<'e, E>(executor: E) -> Result<Vec<Lead>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, name, phone, created_at
        FROM leads
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

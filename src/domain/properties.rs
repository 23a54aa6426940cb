//! Property domain - DB queries for listings

use sqlx::{Executor, Postgres};

use crate::models::{NewProperty, Property};

/// Insert a property listing and return the stored row
pub async fn insert_property<'e, E>(
    executor: E,
    property: &NewProperty,
) -> Result<Property, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO properties (title, location, property_type, description, status, images)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, location, property_type, description, status, images, created_at
        "#,
    )
    .bind(&property.title)
    .bind(&property.location)
    .bind(&property.property_type)
    .bind(&property.description)
    .bind(&property.status)
    .bind(&property.images)
    .fetch_one(executor)
    .await
}

/// List all properties, newest first
pub async fn list_properties<'e, E>(executor: E) -> Result<Vec<Property>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, title, location, property_type, description, status, images, created_at
        FROM properties
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Delete a property. Returns the number of rows removed (0 or 1).
pub async fn delete_property<'e, E>(executor: E, property_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM properties WHERE id = $1")
        .bind(property_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

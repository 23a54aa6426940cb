//! Blog domain - DB queries for posts

use sqlx::{Executor, Postgres};

use crate::models::{BlogPost, NewBlogPost};

pub async fn insert_post<'e, E>(executor: E, post: &NewBlogPost) -> Result<BlogPost, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO blog_posts (title, category, excerpt, content, date, image)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, category, excerpt, content, date, image, created_at
        "#,
    )
    .bind(&post.title)
    .bind(&post.category)
    .bind(&post.excerpt)
    .bind(&post.content)
    .bind(&post.date)
    .bind(&post.image)
    .fetch_one(executor)
    .await
}

pub async fn get_post<'e, E>(executor: E, post_id: i64) -> Result<Option<BlogPost>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, title, category, excerpt, content, date, image, created_at
        FROM blog_posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(executor)
    .await
}

/// List all posts, newest first
pub async fn list_posts<'e, E>(executor: E) -> Result<Vec<BlogPost>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT id, title, category, excerpt, content, date, image, created_at
        FROM blog_posts
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Delete a post. Returns the number of rows removed (0 or 1).
pub async fn delete_post<'e, E>(executor: E, post_id: i64) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
        .bind(post_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

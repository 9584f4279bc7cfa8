//! Bookmark repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::Bookmark;

/// Bookmark repository trait
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Create a bookmark
    async fn create(&self, user_id: i64, post_id: i64) -> Result<Bookmark>;

    /// Get a user's bookmark on a post, if any
    async fn get(&self, user_id: i64, post_id: i64) -> Result<Option<Bookmark>>;

    /// Delete a user's bookmark on a post; returns false if there was none
    async fn delete(&self, user_id: i64, post_id: i64) -> Result<bool>;

    /// List a user's bookmarks, newest first
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Bookmark>>;

    /// Check whether a user has bookmarked a post
    async fn exists(&self, user_id: i64, post_id: i64) -> Result<bool>;
}

/// SQLx-based bookmark repository implementation
pub struct SqlxBookmarkRepository {
    pool: SqlitePool,
}

impl SqlxBookmarkRepository {
    /// Create a new SQLx bookmark repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn BookmarkRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BookmarkRepository for SqlxBookmarkRepository {
    async fn create(&self, user_id: i64, post_id: i64) -> Result<Bookmark> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO bookmarks (user_id, post_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create bookmark")?;

        Ok(Bookmark {
            id: result.last_insert_rowid(),
            user_id,
            post_id,
            created_at: now,
        })
    }

    async fn get(&self, user_id: i64, post_id: i64) -> Result<Option<Bookmark>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, post_id, created_at
            FROM bookmarks
            WHERE user_id = ? AND post_id = ?
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get bookmark")?;

        match row {
            Some(row) => Ok(Some(row_to_bookmark(&row))),
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: i64, post_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = ? AND post_id = ?")
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete bookmark")?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Bookmark>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, post_id, created_at
            FROM bookmarks
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list bookmarks")?;

        let mut bookmarks = Vec::new();
        for row in rows {
            bookmarks.push(row_to_bookmark(&row));
        }

        Ok(bookmarks)
    }

    async fn exists(&self, user_id: i64, post_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM bookmarks WHERE user_id = ? AND post_id = ?",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check bookmark")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }
}

fn row_to_bookmark(row: &sqlx::sqlite::SqliteRow) -> Bookmark {
    Bookmark {
        id: row.get("id"),
        user_id: row.get("user_id"),
        post_id: row.get("post_id"),
        created_at: row.get("created_at"),
    }
}

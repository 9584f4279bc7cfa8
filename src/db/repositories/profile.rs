//! Profile repository
//!
//! Database operations for user profiles.
//!
//! Profiles have no `create` here: the row is inserted by
//! `UserRepository::create_with_profile` inside the registration
//! transaction, and removed by the cascade when the user is deleted.

use crate::models::{Profile, DEFAULT_AVATAR};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Profile repository trait
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Get profile by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Profile>>;

    /// Get profile by owning user ID
    async fn get_by_user_id(&self, user_id: i64) -> Result<Option<Profile>>;

    /// Update a profile
    async fn update(&self, profile: &Profile) -> Result<Profile>;

    /// Check if a display name is taken by a profile other than the given one
    async fn full_name_taken_by_other(&self, full_name: &str, exclude_id: i64) -> Result<bool>;
}

/// SQLx-based profile repository implementation
pub struct SqlxProfileRepository {
    pool: SqlitePool,
}

impl SqlxProfileRepository {
    /// Create a new SQLx profile repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ProfileRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Profile>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, image, full_name, bio, about, author, facebook, twitter, created_at
            FROM profiles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get profile by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_user_id(&self, user_id: i64) -> Result<Option<Profile>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, image, full_name, bio, about, author, facebook, twitter, created_at
            FROM profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get profile by user ID")?;

        match row {
            Some(row) => Ok(Some(row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, profile: &Profile) -> Result<Profile> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET image = ?, full_name = ?, bio = ?, about = ?, author = ?, facebook = ?, twitter = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.image)
        .bind(&profile.full_name)
        .bind(&profile.bio)
        .bind(&profile.about)
        .bind(profile.is_author)
        .bind(&profile.facebook)
        .bind(&profile.twitter)
        .bind(profile.id)
        .execute(&self.pool)
        .await
        .context("Failed to update profile")?;

        self.get_by_id(profile.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Profile not found after update"))
    }

    async fn full_name_taken_by_other(&self, full_name: &str, exclude_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM profiles WHERE full_name = ? AND id != ?",
        )
        .bind(full_name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check display name")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }
}

fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<Profile> {
    let image: Option<String> = row.get("image");

    Ok(Profile {
        id: row.get("id"),
        user_id: row.get("user_id"),
        image: image.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        full_name: row.get("full_name"),
        bio: row.get("bio"),
        about: row.get("about"),
        is_author: row.get("author"),
        facebook: row.get("facebook"),
        twitter: row.get("twitter"),
        created_at: row.get("created_at"),
    })
}

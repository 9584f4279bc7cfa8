//! Bookmark service
//!
//! Readers keep a private list of saved posts. The main entry point is
//! `toggle`, which flips the saved state and reports the new one.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::db::repositories::{BookmarkRepository, PostRepository};
use crate::models::Bookmark;

/// Error types for bookmark service operations
#[derive(Debug, thiserror::Error)]
pub enum BookmarkServiceError {
    /// Referenced post not found
    #[error("Post not found: {0}")]
    PostNotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Bookmark service for saved posts
pub struct BookmarkService {
    repo: Arc<dyn BookmarkRepository>,
    post_repo: Arc<dyn PostRepository>,
}

impl BookmarkService {
    pub fn new(repo: Arc<dyn BookmarkRepository>, post_repo: Arc<dyn PostRepository>) -> Self {
        Self { repo, post_repo }
    }

    /// Toggle a bookmark
    ///
    /// Creates the bookmark when the post is not saved, removes it when
    /// it is, and returns whether the post is now bookmarked.
    ///
    /// # Errors
    /// - `PostNotFound` if the post doesn't exist
    pub async fn toggle(&self, user_id: i64, post_id: i64) -> Result<bool, BookmarkServiceError> {
        if self
            .post_repo
            .get_by_id(post_id)
            .await
            .context("Failed to get post")?
            .is_none()
        {
            return Err(BookmarkServiceError::PostNotFound(post_id));
        }

        if self
            .repo
            .exists(user_id, post_id)
            .await
            .context("Failed to check bookmark")?
        {
            self.repo
                .delete(user_id, post_id)
                .await
                .context("Failed to remove bookmark")?;
            Ok(false)
        } else {
            self.repo
                .create(user_id, post_id)
                .await
                .context("Failed to create bookmark")?;
            Ok(true)
        }
    }

    /// Check whether a user has bookmarked a post
    pub async fn is_bookmarked(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<bool, BookmarkServiceError> {
        self.repo
            .exists(user_id, post_id)
            .await
            .context("Failed to check bookmark")
            .map_err(Into::into)
    }

    /// List a user's bookmarks, newest first
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Bookmark>, BookmarkServiceError> {
        self.repo
            .list_for_user(user_id)
            .await
            .context("Failed to list bookmarks")
            .map_err(Into::into)
    }

    /// Remove a bookmark; returns false if there was none
    pub async fn remove(&self, user_id: i64, post_id: i64) -> Result<bool, BookmarkServiceError> {
        self.repo
            .delete(user_id, post_id)
            .await
            .context("Failed to remove bookmark")
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CategoryRepository, SqlxBookmarkRepository, SqlxCategoryRepository, SqlxPostRepository,
        SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Category, Post, PostStatus, User};
    use crate::services::password::hash_password;
    use chrono::Utc;
    use sqlx::SqlitePool;

    struct Fixture {
        pool: SqlitePool,
        service: BookmarkService,
        user: User,
        post: Post,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let (user, profile) = users
            .create_with_profile(&User::new(
                "reader".to_string(),
                "reader@example.com".to_string(),
                hash_password("test_password").expect("Failed to hash password"),
                None,
            ))
            .await
            .expect("Failed to create user");

        let categories = SqlxCategoryRepository::new(pool.clone());
        let category = categories
            .create(&Category::new("Tech".to_string(), None, "tech".to_string()))
            .await
            .expect("Failed to create category");

        let posts = SqlxPostRepository::new(pool.clone());
        let post = posts
            .create(&Post {
                id: 0,
                user_id: user.id,
                profile_id: profile.id,
                category_id: category.id,
                status: PostStatus::Active,
                title: "Saved For Later".to_string(),
                tags: String::new(),
                description: None,
                image: None,
                slug: "saved-for-later-a1".to_string(),
                view_count: 0,
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to create post");

        let service = BookmarkService::new(
            SqlxBookmarkRepository::boxed(pool.clone()),
            SqlxPostRepository::boxed(pool.clone()),
        );

        Fixture {
            pool,
            service,
            user,
            post,
        }
    }

    async fn second_post(fx: &Fixture, slug: &str) -> Post {
        let posts = SqlxPostRepository::new(fx.pool.clone());
        let base = &fx.post;
        posts
            .create(&Post {
                id: 0,
                title: format!("Also {}", slug),
                slug: slug.to_string(),
                created_at: Utc::now(),
                ..base.clone()
            })
            .await
            .expect("Failed to create post")
    }

    #[tokio::test]
    async fn test_toggle_on_and_off() {
        let fx = setup().await;

        let saved = fx
            .service
            .toggle(fx.user.id, fx.post.id)
            .await
            .expect("Failed to toggle bookmark");
        assert!(saved);
        assert!(fx
            .service
            .is_bookmarked(fx.user.id, fx.post.id)
            .await
            .expect("Failed to check bookmark"));

        let saved = fx
            .service
            .toggle(fx.user.id, fx.post.id)
            .await
            .expect("Failed to toggle bookmark");
        assert!(!saved);
        assert!(!fx
            .service
            .is_bookmarked(fx.user.id, fx.post.id)
            .await
            .expect("Failed to check bookmark"));
    }

    #[tokio::test]
    async fn test_toggle_unknown_post_fails() {
        let fx = setup().await;

        let result = fx.service.toggle(fx.user.id, 99999).await;
        assert!(matches!(
            result,
            Err(BookmarkServiceError::PostNotFound(99999))
        ));
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let fx = setup().await;
        let other = second_post(&fx, "second-save-b2").await;

        fx.service
            .toggle(fx.user.id, fx.post.id)
            .await
            .expect("Failed to toggle bookmark");
        fx.service
            .toggle(fx.user.id, other.id)
            .await
            .expect("Failed to toggle bookmark");

        let bookmarks = fx
            .service
            .list_for_user(fx.user.id)
            .await
            .expect("Failed to list bookmarks");

        assert_eq!(bookmarks.len(), 2);
        assert_eq!(bookmarks[0].post_id, other.id);
        assert_eq!(bookmarks[1].post_id, fx.post.id);
    }

    #[tokio::test]
    async fn test_remove_bookmark() {
        let fx = setup().await;

        fx.service
            .toggle(fx.user.id, fx.post.id)
            .await
            .expect("Failed to toggle bookmark");

        assert!(fx
            .service
            .remove(fx.user.id, fx.post.id)
            .await
            .expect("Failed to remove bookmark"));
        // Nothing left to remove
        assert!(!fx
            .service
            .remove(fx.user.id, fx.post.id)
            .await
            .expect("Failed to remove bookmark"));

        let bookmarks = fx
            .service
            .list_for_user(fx.user.id)
            .await
            .expect("Failed to list bookmarks");
        assert!(bookmarks.is_empty());
    }
}

//! Post service
//!
//! Implements business logic for blog posts:
//! - Create, read, update, delete with validation
//! - Slug generation from the title plus a short random suffix
//! - View counting
//! - Per-user likes
//!
//! A post always references an existing author, the author's profile and
//! a category; the references are resolved and checked before insert.

use crate::db::repositories::{
    CategoryRepository, PostRepository, ProfileRepository, UserRepository,
};
use crate::models::{CreatePostInput, Post, UpdatePostInput, User};
use crate::services::slug::post_slug;
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Post slug already exists
    #[error("Post slug already exists: {0}")]
    DuplicateSlug(String),

    /// Referenced category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// Referenced author not found
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// The author has no profile
    #[error("Profile for user {0} not found")]
    ProfileNotFound(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service for managing blog posts
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    user_repo: Arc<dyn UserRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    category_repo: Arc<dyn CategoryRepository>,
}

impl PostService {
    /// Create a new post service
    pub fn new(
        repo: Arc<dyn PostRepository>,
        user_repo: Arc<dyn UserRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        category_repo: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            repo,
            user_repo,
            profile_repo,
            category_repo,
        }
    }

    /// Create a new post
    ///
    /// The author's profile is resolved through the 1-1 user/profile
    /// relation and stored on the post. When no slug is supplied (or a
    /// blank one), the slug is derived from the title plus a short random
    /// suffix, so two posts may share a title. Status defaults to Active
    /// and the view counter starts at zero.
    ///
    /// # Arguments
    /// * `input` - Post creation input
    ///
    /// # Returns
    /// The created post
    ///
    /// # Errors
    /// - `ValidationError` if the title is blank
    /// - `CategoryNotFound` if the category doesn't exist
    /// - `UserNotFound` if the author doesn't exist
    /// - `ProfileNotFound` if the author has no profile
    /// - `DuplicateSlug` if the slug already exists
    pub async fn create(&self, input: CreatePostInput) -> Result<Post, PostServiceError> {
        if input.title.trim().is_empty() {
            return Err(PostServiceError::ValidationError(
                "Post title cannot be empty".to_string(),
            ));
        }

        if self
            .category_repo
            .get_by_id(input.category_id)
            .await
            .context("Failed to get category")?
            .is_none()
        {
            return Err(PostServiceError::CategoryNotFound(input.category_id));
        }

        if self
            .user_repo
            .get_by_id(input.author_id)
            .await
            .context("Failed to get author")?
            .is_none()
        {
            return Err(PostServiceError::UserNotFound(input.author_id));
        }

        let profile = self
            .profile_repo
            .get_by_user_id(input.author_id)
            .await
            .context("Failed to get author profile")?
            .ok_or(PostServiceError::ProfileNotFound(input.author_id))?;

        // Default the slug from the title, then check uniqueness. A suffix
        // collision is surfaced as an error rather than retried.
        let slug = match input.slug.as_deref() {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => post_slug(&input.title),
        };

        if self
            .repo
            .exists_by_slug(&slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(PostServiceError::DuplicateSlug(slug));
        }

        let post = Post {
            id: 0,
            user_id: input.author_id,
            profile_id: profile.id,
            category_id: input.category_id,
            status: input.status.unwrap_or_default(),
            title: input.title,
            tags: input.tags.unwrap_or_default(),
            description: input.description.and_then(non_blank),
            image: input.image.and_then(non_blank),
            slug,
            view_count: 0,
            created_at: Utc::now(),
        };

        let created = self.repo.create(&post).await.context("Failed to create post")?;

        Ok(created)
    }

    /// Get post by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>, PostServiceError> {
        let post = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get post by ID")?;

        Ok(post)
    }

    /// Get post by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, PostServiceError> {
        let post = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get post by slug")?;

        Ok(post)
    }

    /// List all posts, newest first
    pub async fn list(&self) -> Result<Vec<Post>, PostServiceError> {
        let posts = self.repo.list().await.context("Failed to list posts")?;

        Ok(posts)
    }

    /// List posts in a category, newest first
    pub async fn list_by_category(&self, category_id: i64) -> Result<Vec<Post>, PostServiceError> {
        let posts = self
            .repo
            .list_by_category(category_id)
            .await
            .context("Failed to list posts by category")?;

        Ok(posts)
    }

    /// List posts by an author, newest first
    pub async fn list_by_author(&self, user_id: i64) -> Result<Vec<Post>, PostServiceError> {
        let posts = self
            .repo
            .list_by_author(user_id)
            .await
            .context("Failed to list posts by author")?;

        Ok(posts)
    }

    /// Update a post
    ///
    /// Fields left as `None` keep their current value. Status moves freely
    /// between values. A slug set to a blank string is re-derived from the
    /// title (the new title when one is supplied in the same call) with a
    /// fresh random suffix. The view counter is never touched by updates.
    ///
    /// # Errors
    /// - `NotFound` if the post doesn't exist
    /// - `ValidationError` if the new title is blank
    /// - `CategoryNotFound` if the new category doesn't exist
    /// - `DuplicateSlug` if the new slug already exists
    pub async fn update(&self, id: i64, input: UpdatePostInput) -> Result<Post, PostServiceError> {
        let mut post = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or_else(|| PostServiceError::NotFound(format!("Post with ID {} not found", id)))?;

        if let Some(category_id) = input.category_id {
            if self
                .category_repo
                .get_by_id(category_id)
                .await
                .context("Failed to get category")?
                .is_none()
            {
                return Err(PostServiceError::CategoryNotFound(category_id));
            }
            post.category_id = category_id;
        }

        if let Some(status) = input.status {
            post.status = status;
        }

        if let Some(ref title) = input.title {
            if title.trim().is_empty() {
                return Err(PostServiceError::ValidationError(
                    "Post title cannot be empty".to_string(),
                ));
            }
            post.title = title.clone();
        }

        if let Some(tags) = input.tags {
            post.tags = tags;
        }

        if let Some(description) = input.description {
            post.description = non_blank(description);
        }

        if let Some(image) = input.image {
            post.image = non_blank(image);
        }

        if let Some(ref new_slug) = input.slug {
            let new_slug = if new_slug.trim().is_empty() {
                post_slug(&post.title)
            } else {
                new_slug.trim().to_string()
            };

            if new_slug != post.slug {
                if self
                    .repo
                    .slug_taken_by_other(&new_slug, id)
                    .await
                    .context("Failed to check slug uniqueness")?
                {
                    return Err(PostServiceError::DuplicateSlug(new_slug));
                }
                post.slug = new_slug;
            }
        }

        let updated = self.repo.update(&post).await.context("Failed to update post")?;

        Ok(updated)
    }

    /// Delete a post
    ///
    /// The schema cascades the delete to the comments, likes and
    /// bookmarks of the post.
    ///
    /// # Errors
    /// - `NotFound` if the post doesn't exist
    pub async fn delete(&self, id: i64) -> Result<(), PostServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or_else(|| PostServiceError::NotFound(format!("Post with ID {} not found", id)))?;

        self.repo.delete(id).await.context("Failed to delete post")?;

        Ok(())
    }

    /// Record a view of a post and return it with the updated counter
    ///
    /// # Errors
    /// - `NotFound` if the post doesn't exist
    pub async fn record_view(&self, id: i64) -> Result<Post, PostServiceError> {
        self.repo
            .increment_view(id)
            .await
            .context("Failed to record view")?;

        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get post")?
            .ok_or_else(|| PostServiceError::NotFound(format!("Post with ID {} not found", id)))
    }

    /// Like a post on behalf of a user
    ///
    /// Liking twice is a no-op: the first call returns `true`, repeat
    /// calls return `false`.
    ///
    /// # Errors
    /// - `NotFound` if the post doesn't exist
    pub async fn like(&self, post_id: i64, user_id: i64) -> Result<bool, PostServiceError> {
        self.repo
            .get_by_id(post_id)
            .await
            .context("Failed to get post")?
            .ok_or_else(|| {
                PostServiceError::NotFound(format!("Post with ID {} not found", post_id))
            })?;

        let liked = self
            .repo
            .add_like(post_id, user_id)
            .await
            .context("Failed to like post")?;

        Ok(liked)
    }

    /// Remove a user's like from a post; returns false if there was none
    pub async fn unlike(&self, post_id: i64, user_id: i64) -> Result<bool, PostServiceError> {
        self.repo
            .remove_like(post_id, user_id)
            .await
            .context("Failed to unlike post")
            .map_err(Into::into)
    }

    /// Check whether a user has liked a post
    pub async fn is_liked(&self, post_id: i64, user_id: i64) -> Result<bool, PostServiceError> {
        self.repo
            .is_liked(post_id, user_id)
            .await
            .context("Failed to check like")
            .map_err(Into::into)
    }

    /// Count the likes on a post
    pub async fn like_count(&self, post_id: i64) -> Result<i64, PostServiceError> {
        self.repo
            .like_count(post_id)
            .await
            .context("Failed to count likes")
            .map_err(Into::into)
    }

    /// List the users who liked a post, ordered by username
    pub async fn likers(&self, post_id: i64) -> Result<Vec<User>, PostServiceError> {
        self.repo
            .likers(post_id)
            .await
            .context("Failed to list likers")
            .map_err(Into::into)
    }
}

/// Keep a text value when it is non-blank, otherwise clear the field
fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

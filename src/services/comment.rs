//! Comment service
//!
//! Visitors comment on posts with a name and an email; the post author
//! can attach a single reply to each comment.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::db::repositories::{CommentRepository, PostRepository};
use crate::models::{Comment, CreateCommentInput};

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Comment not found
    #[error("Comment not found: {0}")]
    NotFound(String),

    /// Referenced post not found
    #[error("Post not found: {0}")]
    PostNotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Comment service for managing post comments
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>, post_repo: Arc<dyn PostRepository>) -> Self {
        Self { repo, post_repo }
    }

    /// Add a comment to a post
    ///
    /// The post must exist and the commenter's name, email and text must
    /// all be non-blank.
    pub async fn add(&self, input: CreateCommentInput) -> Result<Comment, CommentServiceError> {
        if self
            .post_repo
            .get_by_id(input.post_id)
            .await
            .context("Failed to get post")?
            .is_none()
        {
            return Err(CommentServiceError::PostNotFound(input.post_id));
        }

        validate_non_blank("Name", &input.name)?;
        validate_non_blank("Email", &input.email)?;
        validate_non_blank("Comment", &input.comment)?;

        let comment = Comment {
            id: 0,
            post_id: input.post_id,
            name: input.name,
            email: input.email,
            comment: input.comment,
            reply: None,
            created_at: Utc::now(),
        };

        let created = self
            .repo
            .create(&comment)
            .await
            .context("Failed to create comment")?;

        Ok(created)
    }

    /// Attach the author's reply to a comment
    pub async fn reply(&self, comment_id: i64, text: &str) -> Result<Comment, CommentServiceError> {
        validate_non_blank("Reply", text)?;

        self.repo
            .get_by_id(comment_id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(|| {
                CommentServiceError::NotFound(format!("Comment with ID {} not found", comment_id))
            })?;

        let replied = self
            .repo
            .set_reply(comment_id, text)
            .await
            .context("Failed to set reply")?;

        Ok(replied)
    }

    /// Get comment by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Comment>, CommentServiceError> {
        let comment = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?;

        Ok(comment)
    }

    /// List comments on a post, oldest first
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, CommentServiceError> {
        self.repo
            .list_for_post(post_id)
            .await
            .context("Failed to list comments")
            .map_err(Into::into)
    }

    /// Count comments on a post
    pub async fn count_for_post(&self, post_id: i64) -> Result<i64, CommentServiceError> {
        self.repo
            .count_for_post(post_id)
            .await
            .context("Failed to count comments")
            .map_err(Into::into)
    }

    /// Delete a comment
    ///
    /// # Errors
    /// - `NotFound` if the comment doesn't exist
    pub async fn delete(&self, id: i64) -> Result<(), CommentServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(|| {
                CommentServiceError::NotFound(format!("Comment with ID {} not found", id))
            })?;

        self.repo.delete(id).await.context("Failed to delete comment")?;

        Ok(())
    }
}

/// Reject a blank required field
fn validate_non_blank(field: &str, value: &str) -> Result<(), CommentServiceError> {
    if value.trim().is_empty() {
        return Err(CommentServiceError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }

    Ok(())
}

//! Comment repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::models::Comment;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment
    async fn create(&self, comment: &Comment) -> Result<Comment>;

    /// Get comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// List comments on a post, oldest first
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>>;

    /// Attach the author's reply to a comment
    async fn set_reply(&self, id: i64, reply: &str) -> Result<Comment>;

    /// Delete a comment
    async fn delete(&self, id: i64) -> Result<()>;

    /// Count comments on a post
    async fn count_for_post(&self, post_id: i64) -> Result<i64>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: SqlitePool,
}

impl SqlxCommentRepository {
    /// Create a new SQLx comment repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<Comment> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO comments (post_id, name, email, comment, reply, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.post_id)
        .bind(&comment.name)
        .bind(&comment.email)
        .bind(&comment.comment)
        .bind(&comment.reply)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create comment")?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            created_at: now,
            ..comment.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let row = sqlx::query(
            r#"
            SELECT id, post_id, name, email, comment, reply, created_at
            FROM comments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get comment by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_comment(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, post_id, name, email, comment, reply, created_at
            FROM comments
            WHERE post_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments")?;

        let mut comments = Vec::new();
        for row in rows {
            comments.push(row_to_comment(&row)?);
        }

        Ok(comments)
    }

    async fn set_reply(&self, id: i64, reply: &str) -> Result<Comment> {
        sqlx::query("UPDATE comments SET reply = ? WHERE id = ?")
            .bind(reply)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to set reply")?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Comment not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comment")?;

        Ok(())
    }

    async fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count comments")?;

        Ok(row.get("count"))
    }
}

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        name: row.get("name"),
        email: row.get("email"),
        comment: row.get("comment"),
        reply: row.get("reply"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CategoryRepository, PostRepository, SqlxCategoryRepository, SqlxPostRepository,
        SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Category, Post, PostStatus, User};
    use crate::services::password::hash_password;

    async fn setup() -> (SqlitePool, SqlxCommentRepository, Post) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let (user, profile) = users
            .create_with_profile(&User::new(
                "author".to_string(),
                "author@example.com".to_string(),
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
                title: "Commented Post".to_string(),
                tags: String::new(),
                description: None,
                image: None,
                slug: "commented-post-a1".to_string(),
                view_count: 0,
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to create post");

        let repo = SqlxCommentRepository::new(pool.clone());
        (pool, repo, post)
    }

    fn test_comment(post_id: i64, name: &str, text: &str) -> Comment {
        Comment {
            id: 0,
            post_id,
            name: name.to_string(),
            email: format!("{}@example.com", name),
            comment: text.to_string(),
            reply: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_comment() {
        let (_pool, repo, post) = setup().await;

        let created = repo
            .create(&test_comment(post.id, "visitor", "Nice post"))
            .await
            .expect("Failed to create comment");

        assert!(created.id > 0);
        assert_eq!(created.name, "visitor");
        assert_eq!(created.comment, "Nice post");
        assert!(created.reply.is_none());
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post() {
        let (_pool, repo, _post) = setup().await;

        let result = repo.create(&test_comment(999, "visitor", "Orphan")).await;

        assert!(result.is_err(), "Should fail due to missing post");
    }

    #[tokio::test]
    async fn test_list_for_post_oldest_first() {
        let (_pool, repo, post) = setup().await;
        repo.create(&test_comment(post.id, "first", "First!"))
            .await
            .expect("Failed to create comment");
        repo.create(&test_comment(post.id, "second", "Second"))
            .await
            .expect("Failed to create comment");
        repo.create(&test_comment(post.id, "third", "Third"))
            .await
            .expect("Failed to create comment");

        let comments = repo
            .list_for_post(post.id)
            .await
            .expect("Failed to list comments");

        let names: Vec<&str> = comments.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_set_reply() {
        let (_pool, repo, post) = setup().await;
        let created = repo
            .create(&test_comment(post.id, "visitor", "A question"))
            .await
            .expect("Failed to create comment");

        let replied = repo
            .set_reply(created.id, "An answer")
            .await
            .expect("Failed to set reply");

        assert_eq!(replied.reply.as_deref(), Some("An answer"));
        assert!(replied.has_reply());
    }

    #[tokio::test]
    async fn test_delete_comment() {
        let (_pool, repo, post) = setup().await;
        let created = repo
            .create(&test_comment(post.id, "visitor", "Delete me"))
            .await
            .expect("Failed to create comment");

        repo.delete(created.id).await.expect("Failed to delete");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get comment");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_count_for_post() {
        let (_pool, repo, post) = setup().await;
        assert_eq!(
            repo.count_for_post(post.id)
                .await
                .expect("Failed to count"),
            0
        );

        repo.create(&test_comment(post.id, "a", "one"))
            .await
            .expect("Failed to create comment");
        repo.create(&test_comment(post.id, "b", "two"))
            .await
            .expect("Failed to create comment");

        assert_eq!(
            repo.count_for_post(post.id)
                .await
                .expect("Failed to count"),
            2
        );
    }

    #[tokio::test]
    async fn test_comments_cascade_with_post() {
        let (pool, repo, post) = setup().await;
        repo.create(&test_comment(post.id, "visitor", "Going down"))
            .await
            .expect("Failed to create comment");

        let posts = SqlxPostRepository::new(pool.clone());
        posts.delete(post.id).await.expect("Failed to delete post");

        let comments = repo
            .list_for_post(post.id)
            .await
            .expect("Failed to list comments");
        assert!(comments.is_empty());
    }
}

//! Post repository
//!
//! Database operations for posts and their likes.
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite
//!
//! Likes live in the `post_likes` join table keyed by (post_id, user_id),
//! so liking is naturally idempotent.

use crate::db::repositories::user::row_to_user;
use crate::models::{Post, PostStatus, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, post: &Post) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get post by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// List all posts, newest first
    async fn list(&self) -> Result<Vec<Post>>;

    /// List posts in a category, newest first
    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Post>>;

    /// List posts by an author, newest first
    async fn list_by_author(&self, user_id: i64) -> Result<Vec<Post>>;

    /// Update a post
    async fn update(&self, post: &Post) -> Result<Post>;

    /// Delete a post (cascades to comments, bookmarks, likes)
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check if a slug exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug is used by a post other than the given one
    async fn slug_taken_by_other(&self, slug: &str, exclude_id: i64) -> Result<bool>;

    /// Increment the view counter
    async fn increment_view(&self, id: i64) -> Result<()>;

    /// Record a like; returns false if the user had already liked the post
    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<bool>;

    /// Remove a like; returns false if there was none
    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<bool>;

    /// Check whether a user has liked a post
    async fn is_liked(&self, post_id: i64, user_id: i64) -> Result<bool>;

    /// Count likes on a post
    async fn like_count(&self, post_id: i64) -> Result<i64>;

    /// List the users who liked a post
    async fn likers(&self, post_id: i64) -> Result<Vec<User>>;
}

/// SQLx-based post repository implementation
pub struct SqlxPostRepository {
    pool: SqlitePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO posts (user_id, profile_id, category_id, status, title, tags, description, image, slug, view, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(post.user_id)
        .bind(post.profile_id)
        .bind(post.category_id)
        .bind(post.status.as_str())
        .bind(&post.title)
        .bind(&post.tags)
        .bind(&post.description)
        .bind(&post.image)
        .bind(&post.slug)
        .bind(post.view_count)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(Post {
            id: result.last_insert_rowid(),
            created_at: now,
            ..post.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, profile_id, category_id, status, title, tags, description, image, slug, view, created_at
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_post(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, profile_id, category_id, status, title, tags, description, image, slug, view, created_at
            FROM posts
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get post by slug")?;

        match row {
            Some(row) => Ok(Some(row_to_post(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, profile_id, category_id, status, title, tags, description, image, slug, view, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row_to_post(&row)?);
        }

        Ok(posts)
    }

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, profile_id, category_id, status, title, tags, description, image, slug, view, created_at
            FROM posts
            WHERE category_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts by category")?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row_to_post(&row)?);
        }

        Ok(posts)
    }

    async fn list_by_author(&self, user_id: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, profile_id, category_id, status, title, tags, description, image, slug, view, created_at
            FROM posts
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts by author")?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row_to_post(&row)?);
        }

        Ok(posts)
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        sqlx::query(
            r#"
            UPDATE posts
            SET category_id = ?, status = ?, title = ?, tags = ?, description = ?, image = ?, slug = ?
            WHERE id = ?
            "#,
        )
        .bind(post.category_id)
        .bind(post.status.as_str())
        .bind(&post.title)
        .bind(&post.tags)
        .bind(&post.description)
        .bind(&post.image)
        .bind(&post.slug)
        .bind(post.id)
        .execute(&self.pool)
        .await
        .context("Failed to update post")?;

        self.get_by_id(post.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Post not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;

        Ok(())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check post slug")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn slug_taken_by_other(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check post slug")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn increment_view(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE posts SET view = view + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to increment view counter")?;

        Ok(())
    }

    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<bool> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO post_likes (post_id, user_id) VALUES (?, ?)")
                .bind(post_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .context("Failed to add like")?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to remove like")?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_liked(&self, post_id: i64, user_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM post_likes WHERE post_id = ? AND user_id = ?",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check like")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn like_count(&self, post_id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM post_likes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count likes")?;

        Ok(row.get("count"))
    }

    async fn likers(&self, post_id: i64) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.full_name, u.created_at
            FROM users u
            JOIN post_likes pl ON pl.user_id = u.id
            WHERE pl.post_id = ?
            ORDER BY u.username
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list likers")?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> Result<Post> {
    let status_str: String = row.get("status");
    let status = PostStatus::from_str(&status_str)
        .ok_or_else(|| anyhow::anyhow!("Invalid post status: {}", status_str))?;

    Ok(Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        profile_id: row.get("profile_id"),
        category_id: row.get("category_id"),
        status,
        title: row.get("title"),
        tags: row.get("tags"),
        description: row.get("description"),
        image: row.get("image"),
        slug: row.get("slug"),
        view_count: row.get("view"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CategoryRepository, SqlxCategoryRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Category, Profile};
    use crate::services::password::hash_password;

    struct Fixture {
        pool: SqlitePool,
        repo: SqlxPostRepository,
        user: User,
        profile: Profile,
        category: Category,
    }

    async fn setup() -> Fixture {
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

        let repo = SqlxPostRepository::new(pool.clone());

        Fixture {
            pool,
            repo,
            user,
            profile,
            category,
        }
    }

    fn test_post(fx: &Fixture, title: &str, slug: &str) -> Post {
        Post {
            id: 0,
            user_id: fx.user.id,
            profile_id: fx.profile.id,
            category_id: fx.category.id,
            status: PostStatus::Active,
            title: title.to_string(),
            tags: String::new(),
            description: None,
            image: None,
            slug: slug.to_string(),
            view_count: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_post() {
        let fx = setup().await;

        let created = fx
            .repo
            .create(&test_post(&fx, "Hello World", "hello-world-a1"))
            .await
            .expect("Failed to create post");

        assert!(created.id > 0);
        assert_eq!(created.title, "Hello World");
        assert_eq!(created.status, PostStatus::Active);
        assert_eq!(created.view_count, 0);
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let fx = setup().await;
        fx.repo
            .create(&test_post(&fx, "Hello", "hello-a1"))
            .await
            .expect("Failed to create post");

        let found = fx
            .repo
            .get_by_slug("hello-a1")
            .await
            .expect("Failed to get post")
            .expect("Post not found");

        assert_eq!(found.title, "Hello");
    }

    #[tokio::test]
    async fn test_unique_slug_constraint() {
        let fx = setup().await;
        fx.repo
            .create(&test_post(&fx, "First", "same-slug"))
            .await
            .expect("Failed to create post");

        let result = fx.repo.create(&test_post(&fx, "Second", "same-slug")).await;
        assert!(result.is_err(), "Should fail due to duplicate slug");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let fx = setup().await;
        fx.repo
            .create(&test_post(&fx, "Oldest", "oldest-a1"))
            .await
            .expect("Failed to create post");
        fx.repo
            .create(&test_post(&fx, "Middle", "middle-a1"))
            .await
            .expect("Failed to create post");
        fx.repo
            .create(&test_post(&fx, "Newest", "newest-a1"))
            .await
            .expect("Failed to create post");

        let posts = fx.repo.list().await.expect("Failed to list posts");

        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let fx = setup().await;
        let categories = SqlxCategoryRepository::new(fx.pool.clone());
        let other = categories
            .create(&Category::new("Art".to_string(), None, "art".to_string()))
            .await
            .expect("Failed to create category");

        fx.repo
            .create(&test_post(&fx, "In Tech", "in-tech-a1"))
            .await
            .expect("Failed to create post");
        let mut art_post = test_post(&fx, "In Art", "in-art-a1");
        art_post.category_id = other.id;
        fx.repo
            .create(&art_post)
            .await
            .expect("Failed to create post");

        let tech_posts = fx
            .repo
            .list_by_category(fx.category.id)
            .await
            .expect("Failed to list");
        assert_eq!(tech_posts.len(), 1);
        assert_eq!(tech_posts[0].title, "In Tech");

        let art_posts = fx
            .repo
            .list_by_category(other.id)
            .await
            .expect("Failed to list");
        assert_eq!(art_posts.len(), 1);
        assert_eq!(art_posts[0].title, "In Art");
    }

    #[tokio::test]
    async fn test_update_post() {
        let fx = setup().await;
        let mut created = fx
            .repo
            .create(&test_post(&fx, "Draft Title", "draft-a1"))
            .await
            .expect("Failed to create post");

        created.title = "Final Title".to_string();
        created.status = PostStatus::Draft;
        created.tags = "rust,sqlite".to_string();

        let updated = fx.repo.update(&created).await.expect("Failed to update");

        assert_eq!(updated.title, "Final Title");
        assert_eq!(updated.status, PostStatus::Draft);
        assert_eq!(updated.tags, "rust,sqlite");
    }

    #[tokio::test]
    async fn test_delete_post_cascades_to_likes() {
        let fx = setup().await;
        let created = fx
            .repo
            .create(&test_post(&fx, "Doomed", "doomed-a1"))
            .await
            .expect("Failed to create post");
        fx.repo
            .add_like(created.id, fx.user.id)
            .await
            .expect("Failed to like");

        fx.repo.delete(created.id).await.expect("Failed to delete");

        let row = sqlx::query("SELECT COUNT(*) as count FROM post_likes WHERE post_id = ?")
            .bind(created.id)
            .fetch_one(&fx.pool)
            .await
            .expect("Failed to count likes");
        let count: i64 = row.get("count");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_increment_view() {
        let fx = setup().await;
        let created = fx
            .repo
            .create(&test_post(&fx, "Watched", "watched-a1"))
            .await
            .expect("Failed to create post");

        fx.repo
            .increment_view(created.id)
            .await
            .expect("Failed to increment");
        fx.repo
            .increment_view(created.id)
            .await
            .expect("Failed to increment");

        let found = fx
            .repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get post")
            .expect("Post not found");
        assert_eq!(found.view_count, 2);
    }

    #[tokio::test]
    async fn test_like_is_idempotent() {
        let fx = setup().await;
        let created = fx
            .repo
            .create(&test_post(&fx, "Liked", "liked-a1"))
            .await
            .expect("Failed to create post");

        let first = fx
            .repo
            .add_like(created.id, fx.user.id)
            .await
            .expect("Failed to like");
        let second = fx
            .repo
            .add_like(created.id, fx.user.id)
            .await
            .expect("Failed to like");

        assert!(first);
        assert!(!second);

        let count = fx
            .repo
            .like_count(created.id)
            .await
            .expect("Failed to count likes");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_unlike() {
        let fx = setup().await;
        let created = fx
            .repo
            .create(&test_post(&fx, "Liked", "liked-a1"))
            .await
            .expect("Failed to create post");

        fx.repo
            .add_like(created.id, fx.user.id)
            .await
            .expect("Failed to like");
        assert!(fx
            .repo
            .is_liked(created.id, fx.user.id)
            .await
            .expect("Failed to check"));

        let removed = fx
            .repo
            .remove_like(created.id, fx.user.id)
            .await
            .expect("Failed to unlike");
        assert!(removed);
        assert!(!fx
            .repo
            .is_liked(created.id, fx.user.id)
            .await
            .expect("Failed to check"));

        // Removing again is a no-op
        let removed = fx
            .repo
            .remove_like(created.id, fx.user.id)
            .await
            .expect("Failed to unlike");
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_likers() {
        let fx = setup().await;
        let created = fx
            .repo
            .create(&test_post(&fx, "Popular", "popular-a1"))
            .await
            .expect("Failed to create post");

        let users = SqlxUserRepository::new(fx.pool.clone());
        let (reader, _) = users
            .create_with_profile(&User::new(
                "reader".to_string(),
                "reader@example.com".to_string(),
                hash_password("test_password").expect("Failed to hash password"),
                None,
            ))
            .await
            .expect("Failed to create user");

        fx.repo
            .add_like(created.id, fx.user.id)
            .await
            .expect("Failed to like");
        fx.repo
            .add_like(created.id, reader.id)
            .await
            .expect("Failed to like");

        let likers = fx
            .repo
            .likers(created.id)
            .await
            .expect("Failed to list likers");

        let names: Vec<&str> = likers.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["author", "reader"]);
    }

    #[tokio::test]
    async fn test_view_counter_survives_update() {
        let fx = setup().await;
        let created = fx
            .repo
            .create(&test_post(&fx, "Viewed", "viewed-a1"))
            .await
            .expect("Failed to create post");
        fx.repo
            .increment_view(created.id)
            .await
            .expect("Failed to increment");

        // Update does not touch the view column
        let mut changed = created.clone();
        changed.title = "Viewed Again".to_string();
        let updated = fx.repo.update(&changed).await.expect("Failed to update");

        assert_eq!(updated.view_count, 1);
    }
}

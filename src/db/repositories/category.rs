//! Category repository
//!
//! Database operations for categories.
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite

use crate::models::Category;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a new category
    async fn create(&self, category: &Category) -> Result<Category>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Get category by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// List all categories ordered by title
    async fn list(&self) -> Result<Vec<Category>>;

    /// Update a category
    async fn update(&self, category: &Category) -> Result<Category>;

    /// Delete a category (cascades to its posts)
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check if a slug exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug is used by a category other than the given one
    async fn slug_taken_by_other(&self, slug: &str, exclude_id: i64) -> Result<bool>;

    /// Count the posts filed under a category
    async fn post_count(&self, id: i64) -> Result<i64>;
}

/// SQLx-based category repository implementation
pub struct SqlxCategoryRepository {
    pool: SqlitePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, category: &Category) -> Result<Category> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO categories (title, image, slug, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&category.title)
        .bind(&category.image)
        .bind(&category.slug)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create category")?;

        Ok(Category {
            id: result.last_insert_rowid(),
            title: category.title.clone(),
            image: category.image.clone(),
            slug: category.slug.clone(),
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, image, slug, created_at
            FROM categories
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get category by ID")?;

        match row {
            Some(row) => Ok(Some(row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, image, slug, created_at
            FROM categories
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get category by slug")?;

        match row {
            Some(row) => Ok(Some(row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, image, slug, created_at
            FROM categories
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row_to_category(&row)?);
        }

        Ok(categories)
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        sqlx::query(
            r#"
            UPDATE categories
            SET title = ?, image = ?, slug = ?
            WHERE id = ?
            "#,
        )
        .bind(&category.title)
        .bind(&category.image)
        .bind(&category.slug)
        .bind(category.id)
        .execute(&self.pool)
        .await
        .context("Failed to update category")?;

        self.get_by_id(category.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete category")?;

        Ok(())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM categories WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check category slug")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn slug_taken_by_other(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        let row =
            sqlx::query("SELECT COUNT(*) as count FROM categories WHERE slug = ? AND id != ?")
                .bind(slug)
                .bind(exclude_id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to check category slug")?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn post_count(&self, id: i64) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE category_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count posts in category")?;

        Ok(row.get("count"))
    }
}

fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
    Ok(Category {
        id: row.get("id"),
        title: row.get("title"),
        image: row.get("image"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (SqlitePool, SqlxCategoryRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxCategoryRepository::new(pool.clone());
        (pool, repo)
    }

    fn test_category(title: &str, slug: &str) -> Category {
        Category::new(title.to_string(), None, slug.to_string())
    }

    #[tokio::test]
    async fn test_create_category() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&test_category("Tech News", "tech-news"))
            .await
            .expect("Failed to create category");

        assert!(created.id > 0);
        assert_eq!(created.title, "Tech News");
        assert_eq!(created.slug, "tech-news");
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&test_category("Tech News", "tech-news"))
            .await
            .expect("Failed to create category");

        let found = repo
            .get_by_slug("tech-news")
            .await
            .expect("Failed to get category")
            .expect("Category not found");

        assert_eq!(found.title, "Tech News");
    }

    #[tokio::test]
    async fn test_list_ordered_by_title() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&test_category("Zeitgeist", "zeitgeist"))
            .await
            .expect("Failed to create category");
        repo.create(&test_category("Art", "art"))
            .await
            .expect("Failed to create category");
        repo.create(&test_category("Music", "music"))
            .await
            .expect("Failed to create category");

        let categories = repo.list().await.expect("Failed to list categories");

        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Art", "Music", "Zeitgeist"]);
    }

    #[tokio::test]
    async fn test_duplicate_titles_allowed() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&test_category("Tech", "tech-1"))
            .await
            .expect("Failed to create category");

        // Same title with a different slug is fine
        let result = repo.create(&test_category("Tech", "tech-2")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unique_slug_constraint() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&test_category("Tech", "tech"))
            .await
            .expect("Failed to create category");

        let result = repo.create(&test_category("Other Tech", "tech")).await;
        assert!(result.is_err(), "Should fail due to duplicate slug");
    }

    #[tokio::test]
    async fn test_update_category() {
        let (_pool, repo) = setup_test_repo().await;
        let mut created = repo
            .create(&test_category("Tech", "tech"))
            .await
            .expect("Failed to create category");

        created.title = "Technology".to_string();
        created.image = Some("uploads/tech.png".to_string());

        let updated = repo.update(&created).await.expect("Failed to update");

        assert_eq!(updated.title, "Technology");
        assert_eq!(updated.image.as_deref(), Some("uploads/tech.png"));
        assert_eq!(updated.slug, "tech");
    }

    #[tokio::test]
    async fn test_delete_category() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo
            .create(&test_category("Tech", "tech"))
            .await
            .expect("Failed to create category");

        repo.delete(created.id).await.expect("Failed to delete");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get category");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_exists_by_slug() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(&test_category("Tech", "tech"))
            .await
            .expect("Failed to create category");

        assert!(repo.exists_by_slug("tech").await.expect("Failed to check"));
        assert!(!repo
            .exists_by_slug("missing")
            .await
            .expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_slug_taken_by_other() {
        let (_pool, repo) = setup_test_repo().await;
        let a = repo
            .create(&test_category("Tech", "tech"))
            .await
            .expect("Failed to create category");
        let b = repo
            .create(&test_category("Art", "art"))
            .await
            .expect("Failed to create category");

        assert!(repo
            .slug_taken_by_other("tech", b.id)
            .await
            .expect("Failed to check"));
        assert!(!repo
            .slug_taken_by_other("tech", a.id)
            .await
            .expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_post_count_empty() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo
            .create(&test_category("Tech", "tech"))
            .await
            .expect("Failed to create category");

        let count = repo
            .post_count(created.id)
            .await
            .expect("Failed to count posts");
        assert_eq!(count, 0);
    }
}

//! Category service
//!
//! Implements business logic for category management:
//! - Create, read, update, delete categories
//! - Slug generation from the title when none is supplied
//! - Slug uniqueness validation
//!
//! Deleting a category removes the posts filed under it through the
//! schema's cascade rules.

use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CreateCategoryInput, UpdateCategoryInput};
use crate::services::slug::slugify;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category slug already exists
    #[error("Category slug already exists: {0}")]
    DuplicateSlug(String),

    /// Category not found
    #[error("Category not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service for managing blog categories
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Create a new category
    ///
    /// When no slug is supplied (or a blank one), the slug is derived from
    /// the title. Two categories may share a title, but never a slug.
    ///
    /// # Arguments
    /// * `input` - Category creation input
    ///
    /// # Returns
    /// The created category
    ///
    /// # Errors
    /// - `ValidationError` if the title is blank or yields an empty slug
    /// - `DuplicateSlug` if a category with the same slug already exists
    pub async fn create(&self, input: CreateCategoryInput) -> Result<Category, CategoryServiceError> {
        if input.title.trim().is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Category title cannot be empty".to_string(),
            ));
        }

        let slug = derive_slug(input.slug.as_deref(), &input.title)?;

        if self
            .repo
            .exists_by_slug(&slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(CategoryServiceError::DuplicateSlug(slug));
        }

        let category = Category::new(input.title, input.image, slug);

        let created = self
            .repo
            .create(&category)
            .await
            .context("Failed to create category")?;

        Ok(created)
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Category>, CategoryServiceError> {
        let category = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category by ID")?;

        Ok(category)
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, CategoryServiceError> {
        let category = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get category by slug")?;

        Ok(category)
    }

    /// List all categories ordered by title
    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        let list = self.repo.list().await.context("Failed to list categories")?;

        Ok(list)
    }

    /// Update a category
    ///
    /// Fields left as `None` keep their current value. A slug set to a
    /// blank string is re-derived from the title, using the new title when
    /// one is supplied in the same call.
    ///
    /// # Errors
    /// - `NotFound` if the category doesn't exist
    /// - `ValidationError` if the new title is blank
    /// - `DuplicateSlug` if the new slug already exists
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| {
                CategoryServiceError::NotFound(format!("Category with ID {} not found", id))
            })?;

        if let Some(ref new_title) = input.title {
            if new_title.trim().is_empty() {
                return Err(CategoryServiceError::ValidationError(
                    "Category title cannot be empty".to_string(),
                ));
            }
            category.title = new_title.clone();
        }

        if let Some(ref new_slug) = input.slug {
            let new_slug = derive_slug(Some(new_slug), &category.title)?;

            if new_slug != category.slug {
                if self
                    .repo
                    .slug_taken_by_other(&new_slug, id)
                    .await
                    .context("Failed to check slug uniqueness")?
                {
                    return Err(CategoryServiceError::DuplicateSlug(new_slug));
                }
                category.slug = new_slug;
            }
        }

        if let Some(new_image) = input.image {
            category.image = if new_image.trim().is_empty() {
                None
            } else {
                Some(new_image)
            };
        }

        let updated = self
            .repo
            .update(&category)
            .await
            .context("Failed to update category")?;

        Ok(updated)
    }

    /// Delete a category
    ///
    /// The schema cascades the delete to every post filed under the
    /// category.
    ///
    /// # Errors
    /// - `NotFound` if the category doesn't exist
    pub async fn delete(&self, id: i64) -> Result<(), CategoryServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| {
                CategoryServiceError::NotFound(format!("Category with ID {} not found", id))
            })?;

        self.repo
            .delete(id)
            .await
            .context("Failed to delete category")?;

        Ok(())
    }

    /// Check if a category slug already exists
    pub async fn exists_by_slug(&self, slug: &str) -> Result<bool, CategoryServiceError> {
        self.repo
            .exists_by_slug(slug)
            .await
            .context("Failed to check slug existence")
            .map_err(Into::into)
    }

    /// Count the posts filed under a category
    pub async fn post_count(&self, id: i64) -> Result<i64, CategoryServiceError> {
        self.repo
            .post_count(id)
            .await
            .context("Failed to count posts")
            .map_err(Into::into)
    }
}

/// Use the given slug when it is non-blank, otherwise derive one from
/// the title
fn derive_slug(slug: Option<&str>, title: &str) -> Result<String, CategoryServiceError> {
    let slug = match slug {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => slugify(title),
    };

    if slug.is_empty() {
        return Err(CategoryServiceError::ValidationError(format!(
            "Title '{}' does not yield a usable slug",
            title
        )));
    }

    Ok(slug)
}

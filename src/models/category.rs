//! Category model
//!
//! This module defines the Category entity used to group posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity grouping posts by topic.
///
/// Titles are not unique; the slug is, and it is derived from the title
/// when not supplied explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Category title
    pub title: String,
    /// Cover image path
    pub image: Option<String>,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new Category with the given parameters.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(title: String, image: Option<String>, slug: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            title,
            image,
            slug,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a new category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Category title
    pub title: String,
    /// Cover image path (optional)
    pub image: Option<String>,
    /// Explicit slug (optional, defaults to the slugified title)
    pub slug: Option<String>,
}

/// Input for updating a category
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New cover image path (optional)
    pub image: Option<String>,
    /// New slug (optional; blank re-derives from the title)
    pub slug: Option<String>,
}

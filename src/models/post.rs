//! Post model
//!
//! This module defines the Post entity and related types:
//! - `Post` struct for blog posts
//! - `PostStatus` enum for publication states
//! - Input types for creating and updating posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity representing a blog post.
///
/// A post belongs to a user, that user's profile, and a category. The
/// slug is unique and carries a short random suffix so two posts with
/// the same title can coexist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Owning user ID
    pub user_id: i64,
    /// Owning profile ID
    pub profile_id: i64,
    /// Category ID
    pub category_id: i64,
    /// Publication status
    pub status: PostStatus,
    /// Post title
    pub title: String,
    /// Free-form tag string
    pub tags: String,
    /// Body text
    pub description: Option<String>,
    /// Cover image path
    pub image: Option<String>,
    /// URL-friendly slug (unique)
    pub slug: String,
    /// View counter
    pub view_count: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Post publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    /// Active - visible to public
    Active,
    /// Draft - not yet published
    Draft,
    /// Disabled - hidden by moderation
    Disabled,
}

impl Default for PostStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl PostStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Active => "Active",
            PostStatus::Draft => "Draft",
            PostStatus::Disabled => "Disabled",
        }
    }

    /// Parse status from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(PostStatus::Active),
            "draft" => Some(PostStatus::Draft),
            "disabled" => Some(PostStatus::Disabled),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new post
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    /// Author user ID
    pub author_id: i64,
    /// Category ID
    pub category_id: i64,
    /// Post title
    pub title: String,
    /// Free-form tag string (optional)
    pub tags: Option<String>,
    /// Body text (optional)
    pub description: Option<String>,
    /// Cover image path (optional)
    pub image: Option<String>,
    /// Explicit slug (optional, defaults to slugified title plus suffix)
    pub slug: Option<String>,
    /// Publication status (defaults to Active)
    pub status: Option<PostStatus>,
}

/// Input for updating a post
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    /// New category (optional)
    pub category_id: Option<i64>,
    /// New status (optional)
    pub status: Option<PostStatus>,
    /// New title (optional)
    pub title: Option<String>,
    /// New tag string (optional)
    pub tags: Option<String>,
    /// New body text (optional)
    pub description: Option<String>,
    /// New cover image path (optional)
    pub image: Option<String>,
    /// New slug (optional; blank re-derives from the title)
    pub slug: Option<String>,
}

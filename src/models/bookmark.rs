//! Bookmark model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookmark marking a post as saved by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    /// Unique identifier
    pub id: i64,
    /// User who saved the post
    pub user_id: i64,
    /// Saved post
    pub post_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment left on a post by a visitor.
///
/// Commenters are identified by name and email rather than an account,
/// so anyone can comment. The post author may attach a single reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: i64,
    /// Post the comment belongs to
    pub post_id: i64,
    /// Commenter name
    pub name: String,
    /// Commenter email
    pub email: String,
    /// Comment text
    pub comment: String,
    /// Author's reply, if any
    pub reply: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Check if the post author has replied to this comment
    pub fn has_reply(&self) -> bool {
        self.reply.is_some()
    }
}

/// Input for adding a comment to a post
#[derive(Debug, Clone)]
pub struct CreateCommentInput {
    /// Post to comment on
    pub post_id: i64,
    /// Commenter name
    pub name: String,
    /// Commenter email
    pub email: String,
    /// Comment text
    pub comment: String,
}

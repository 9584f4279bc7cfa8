//! Profile model
//!
//! This module defines the Profile entity, the public-facing companion of a
//! user account. Every user owns exactly one profile, created together with
//! the account and removed with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder avatar path used when no image has been uploaded.
pub const DEFAULT_AVATAR: &str = "default/default-user.jpg";

/// Profile entity holding the public-facing attributes of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier
    pub id: i64,
    /// Owning user (unique, one profile per user)
    pub user_id: i64,
    /// Avatar image path
    pub image: String,
    /// Display name (unique among profiles)
    pub full_name: Option<String>,
    /// Short bio line
    pub bio: Option<String>,
    /// Longer about text
    pub about: Option<String>,
    /// Whether the user is a published author
    pub is_author: bool,
    /// Facebook handle
    pub facebook: Option<String>,
    /// Twitter handle
    pub twitter: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Create the initial profile for a freshly registered user.
    ///
    /// The display name starts out as the account username and the avatar
    /// points at the placeholder image.
    pub fn new_for_user(user_id: i64, username: &str) -> Self {
        Self {
            id: 0, // Will be set by the database
            user_id,
            image: DEFAULT_AVATAR.to_string(),
            full_name: Some(username.to_string()),
            bio: None,
            about: None,
            is_author: false,
            facebook: None,
            twitter: None,
            created_at: Utc::now(),
        }
    }

    /// Check if the avatar is still the placeholder image
    pub fn has_default_avatar(&self) -> bool {
        self.image == DEFAULT_AVATAR
    }
}

/// Input for updating a profile
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    /// New avatar path (optional; blank restores the placeholder)
    pub image: Option<String>,
    /// New display name (optional; blank re-derives from the username)
    pub full_name: Option<String>,
    /// New bio (optional)
    pub bio: Option<String>,
    /// New about text (optional)
    pub about: Option<String>,
    /// New author flag (optional)
    pub is_author: Option<bool>,
    /// New Facebook handle (optional)
    pub facebook: Option<String>,
    /// New Twitter handle (optional)
    pub twitter: Option<String>,
}

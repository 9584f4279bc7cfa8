//! Profile service
//!
//! Implements business logic for author profiles. Every account owns
//! exactly one profile, created together with the user row, so this
//! service only reads and updates. Updates re-apply the profile
//! defaults: a blank display name falls back to the owner's username
//! and a blank image path falls back to the stock avatar.

use crate::db::repositories::{ProfileRepository, UserRepository};
use crate::models::{Profile, UpdateProfileInput, DEFAULT_AVATAR};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for profile service operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    /// Another profile already uses this display name
    #[error("Display name '{0}' is already taken")]
    DuplicateFullName(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Service for reading and updating author profiles
pub struct ProfileService {
    profile_repo: Arc<dyn ProfileRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl ProfileService {
    /// Create a new profile service with the given repositories
    pub fn new(profile_repo: Arc<dyn ProfileRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            profile_repo,
            user_repo,
        }
    }

    /// Get profile by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Profile>, ProfileServiceError> {
        let profile = self
            .profile_repo
            .get_by_id(id)
            .await
            .context("Failed to get profile by ID")?;

        Ok(profile)
    }

    /// Get the profile owned by a user
    pub async fn get_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, ProfileServiceError> {
        let profile = self
            .profile_repo
            .get_by_user_id(user_id)
            .await
            .context("Failed to get profile by user ID")?;

        Ok(profile)
    }

    /// Update the profile owned by a user
    ///
    /// Fields left as `None` keep their current value. A display name set
    /// to a blank string falls back to the owner's username, and a blank
    /// image path falls back to the stock avatar. Blank text fields (bio,
    /// about, social links) are cleared.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user has no profile
    /// - `DuplicateFullName` if another profile uses the display name
    pub async fn update(
        &self,
        user_id: i64,
        input: UpdateProfileInput,
    ) -> Result<Profile, ProfileServiceError> {
        let mut profile = self
            .profile_repo
            .get_by_user_id(user_id)
            .await
            .context("Failed to get profile")?
            .ok_or_else(|| {
                ProfileServiceError::NotFound(format!("Profile for user ID {} not found", user_id))
            })?;

        if let Some(full_name) = &input.full_name {
            let full_name = if full_name.trim().is_empty() {
                // Fall back to the owner's username
                let owner = self
                    .user_repo
                    .get_by_id(user_id)
                    .await
                    .context("Failed to get profile owner")?
                    .ok_or_else(|| {
                        ProfileServiceError::NotFound(format!(
                            "User with ID {} not found",
                            user_id
                        ))
                    })?;
                owner.username
            } else {
                full_name.trim().to_string()
            };

            if profile.full_name.as_deref() != Some(full_name.as_str()) {
                let taken = self
                    .profile_repo
                    .full_name_taken_by_other(&full_name, profile.id)
                    .await
                    .context("Failed to check display name")?;

                if taken {
                    return Err(ProfileServiceError::DuplicateFullName(full_name));
                }
                profile.full_name = Some(full_name);
            }
        }

        if let Some(image) = &input.image {
            profile.image = if image.trim().is_empty() {
                DEFAULT_AVATAR.to_string()
            } else {
                image.clone()
            };
        }

        if let Some(bio) = input.bio {
            profile.bio = non_blank(bio);
        }

        if let Some(about) = input.about {
            profile.about = non_blank(about);
        }

        if let Some(facebook) = input.facebook {
            profile.facebook = non_blank(facebook);
        }

        if let Some(twitter) = input.twitter {
            profile.twitter = non_blank(twitter);
        }

        if let Some(is_author) = input.is_author {
            profile.is_author = is_author;
        }

        let updated = self
            .profile_repo
            .update(&profile)
            .await
            .context("Failed to update profile")?;

        Ok(updated)
    }
}

/// Keep a text value when it is non-blank, otherwise clear the field
fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

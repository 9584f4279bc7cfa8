//! User service
//!
//! Implements business logic for account management:
//! - Registration with input normalization (username and display name
//!   default to the local part of the email address)
//! - Atomic creation of the user row together with its profile row
//! - Credential verification for email/password sign-in
//! - Account updates that re-apply the registration defaults

use crate::db::repositories::UserRepository;
use crate::models::{RegisterUserInput, UpdateUserInput, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// User not found
    #[error("User not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// User service for managing accounts
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new user service with the given repository
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Register a new user
    ///
    /// A blank or absent username defaults to the local part of the email
    /// address, and the display name follows the same rule. The user row
    /// and its profile row are inserted in a single transaction, so a
    /// failure partway through leaves no orphaned account behind.
    ///
    /// # Arguments
    ///
    /// * `input` - Registration input containing email, password and
    ///   optional username and display name
    ///
    /// # Returns
    ///
    /// The created user on success
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the email or password is invalid
    /// - `UserExists` if the username or email is already taken
    /// - `InternalError` for database errors
    pub async fn register(&self, input: RegisterUserInput) -> Result<User, UserServiceError> {
        // Validate input
        self.validate_register_input(&input)?;

        // Normalize: blank names fall back to the email local part
        let username = name_or_local_part(input.username.as_deref(), &input.email);
        let full_name = name_or_local_part(input.full_name.as_deref(), &input.email);

        // Check if username already exists
        if self
            .user_repo
            .get_by_username(&username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        // Check if email already exists
        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        // Hash password
        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        // Create user and profile in one transaction
        let user = User::new(username, input.email, password_hash, Some(full_name));

        let (created_user, _profile) = self
            .user_repo
            .create_with_profile(&user)
            .await
            .context("Failed to create user")?;

        Ok(created_user)
    }

    /// Verify an email/password pair
    ///
    /// Accounts sign in by email address. The error message does not
    /// reveal whether the email or the password was wrong.
    ///
    /// # Arguments
    ///
    /// * `email` - The account email address
    /// * `password` - The password to check
    ///
    /// # Returns
    ///
    /// The matching user on success
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` if the credentials are invalid
    /// - `InternalError` for database errors
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to get user by email")?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError("Invalid email or password".to_string())
            })?;

        let password_valid = verify_password(password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user by ID")?;

        Ok(user)
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to get user by username")?;

        Ok(user)
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to get user by email")?;

        Ok(user)
    }

    /// Update an existing user
    ///
    /// Fields left as `None` keep their current value. A username or
    /// display name explicitly set to a blank string falls back to the
    /// local part of the account email, the same rule applied at
    /// registration. When the email changes in the same call, the
    /// fallback uses the new email.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user doesn't exist
    /// - `ValidationError` if the new email or password is invalid
    /// - `UserExists` if the new username or email is already taken
    pub async fn update(&self, id: i64, input: UpdateUserInput) -> Result<User, UserServiceError> {
        let mut user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or_else(|| UserServiceError::NotFound(format!("User with ID {} not found", id)))?;

        if let Some(email) = &input.email {
            validate_email(email)?;

            if *email != user.email {
                if self
                    .user_repo
                    .get_by_email(email)
                    .await
                    .context("Failed to check email")?
                    .is_some()
                {
                    return Err(UserServiceError::UserExists(format!(
                        "Email '{}' is already registered",
                        email
                    )));
                }
                user.email = email.clone();
            }
        }

        if let Some(username) = &input.username {
            let username = name_or_local_part(Some(username), &user.email);

            if username != user.username {
                if self
                    .user_repo
                    .get_by_username(&username)
                    .await
                    .context("Failed to check username")?
                    .is_some()
                {
                    return Err(UserServiceError::UserExists(format!(
                        "Username '{}' is already taken",
                        username
                    )));
                }
                user.username = username;
            }
        }

        if let Some(full_name) = &input.full_name {
            user.full_name = Some(name_or_local_part(Some(full_name), &user.email));
        }

        if let Some(password) = &input.password {
            if password.is_empty() {
                return Err(UserServiceError::ValidationError(
                    "Password cannot be empty".to_string(),
                ));
            }
            user.password_hash = hash_password(password).context("Failed to hash password")?;
        }

        let updated = self
            .user_repo
            .update(&user)
            .await
            .context("Failed to update user")?;

        Ok(updated)
    }

    /// Delete a user
    ///
    /// The schema cascades the delete to the profile, posts, likes and
    /// bookmarks of the account.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user doesn't exist
    pub async fn delete(&self, id: i64) -> Result<(), UserServiceError> {
        self.user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or_else(|| UserServiceError::NotFound(format!("User with ID {} not found", id)))?;

        self.user_repo
            .delete(id)
            .await
            .context("Failed to delete user")?;

        Ok(())
    }

    // ========================================================================
    // Private helper methods
    // ========================================================================

    /// Validate registration input
    fn validate_register_input(&self, input: &RegisterUserInput) -> Result<(), UserServiceError> {
        validate_email(&input.email)?;

        if input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validate that an email address has a non-empty local part before an '@'
fn validate_email(email: &str) -> Result<(), UserServiceError> {
    match email.find('@') {
        Some(idx) if idx > 0 => Ok(()),
        _ => Err(UserServiceError::ValidationError(format!(
            "Invalid email address: '{}'",
            email
        ))),
    }
}

/// The part of an email address before the first '@'
fn email_local_part(email: &str) -> &str {
    match email.find('@') {
        Some(idx) => &email[..idx],
        None => email,
    }
}

/// Use the given name when it is non-blank, otherwise fall back to the
/// local part of the email address
fn name_or_local_part(name: Option<&str>, email: &str) -> String {
    match name {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => email_local_part(email).to_string(),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::db::repositories::{ProfileRepository, SqlxProfileRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};
    use proptest::prelude::*;

    /// Helper to create a fresh service on its own in-memory database
    async fn setup_property_test_service() -> (sqlx::SqlitePool, UserService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        (pool.clone(), UserService::new(user_repo))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Registering without a username derives it from the email local
        /// part, and the new profile carries that name as its display name.
        #[test]
        fn property_registration_defaults_from_email_local_part(
            local in "[a-z][a-z0-9]{2,11}",
            password in "[a-zA-Z0-9]{8,20}"
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let (pool, service) = setup_property_test_service().await;

                let email = format!("{}@example.com", local);
                let input = RegisterUserInput {
                    username: None,
                    email: email.clone(),
                    password: password.clone(),
                    full_name: None,
                };
                let user = service.register(input).await
                    .expect("Registration should succeed");

                prop_assert_eq!(&user.username, &local);
                prop_assert_eq!(user.full_name.as_deref(), Some(local.as_str()));

                let profile_repo = SqlxProfileRepository::new(pool);
                let profile = profile_repo.get_by_user_id(user.id).await
                    .expect("Profile lookup should not error")
                    .expect("Profile should exist");
                prop_assert_eq!(profile.full_name.as_deref(), Some(local.as_str()));
                Ok(())
            });
            result?;
        }

        /// For any valid credentials, registration followed by credential
        /// verification returns the same account.
        #[test]
        fn property_credentials_roundtrip(
            local in "[a-z][a-z0-9]{2,11}",
            password in "[a-zA-Z0-9!@#$%^&*]{8,20}"
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let (_pool, service) = setup_property_test_service().await;

                let email = format!("{}@example.com", local);
                let input = RegisterUserInput {
                    username: None,
                    email: email.clone(),
                    password: password.clone(),
                    full_name: None,
                };
                let registered = service.register(input).await
                    .expect("Registration should succeed");

                let verified = service.verify_credentials(&email, &password).await
                    .expect("Verification should succeed with valid credentials");

                prop_assert_eq!(verified.id, registered.id);
                prop_assert_eq!(verified.email, registered.email);
                Ok(())
            });
            result?;
        }
    }
}

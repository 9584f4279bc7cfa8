//! Services layer - Business logic
//!
//! This module contains all business logic services for the Inkpot blog
//! platform. Services are responsible for:
//! - Implementing business rules and defaulting behavior
//! - Coordinating between repositories
//! - Handling validation and error cases

pub mod bookmark;
pub mod category;
pub mod comment;
pub mod password;
pub mod post;
pub mod profile;
pub mod slug;
pub mod user;

pub use bookmark::{BookmarkService, BookmarkServiceError};
pub use category::{CategoryService, CategoryServiceError};
pub use comment::{CommentService, CommentServiceError};
pub use password::{hash_password, verify_password};
pub use post::{PostService, PostServiceError};
pub use profile::{ProfileService, ProfileServiceError};
pub use slug::{post_slug, random_suffix, slugify};
pub use user::{UserService, UserServiceError};

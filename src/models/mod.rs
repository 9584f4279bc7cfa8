//! Data models
//!
//! This module contains all data structures used throughout the Inkpot data
//! layer: database entities (User, Profile, Category, Post, Comment,
//! Bookmark) and the input types used to create and update them.

mod bookmark;
mod category;
mod comment;
mod post;
mod profile;
mod user;

pub use bookmark::Bookmark;
pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use comment::{Comment, CreateCommentInput};
pub use post::{CreatePostInput, Post, PostStatus, UpdatePostInput};
pub use profile::{Profile, UpdateProfileInput, DEFAULT_AVATAR};
pub use user::{RegisterUserInput, UpdateUserInput, User};

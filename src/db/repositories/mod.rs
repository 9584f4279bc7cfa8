//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod bookmark;
pub mod category;
pub mod comment;
pub mod post;
pub mod profile;
pub mod user;

pub use bookmark::{BookmarkRepository, SqlxBookmarkRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use profile::{ProfileRepository, SqlxProfileRepository};
pub use user::{SqlxUserRepository, UserRepository};

//! Database layer
//!
//! This module provides database access for the Inkpot blog data layer,
//! backed by SQLite for single-binary deployment.
//!
//! # Usage
//!
//! ```ignore
//! use inkpot::config::DatabaseConfig;
//! use inkpot::db::{create_pool, migrations};
//!
//! // Create pool from configuration
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//!
//! // Run migrations
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};

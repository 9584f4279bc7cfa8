//! Inkpot - the data model and persistence layer of a blogging platform
//!
//! This library owns the persistent entities of the platform (users,
//! profiles, categories, posts, comments, bookmarks) and the rules that
//! govern how they are written: defaulting of blank fields, slug
//! generation, the one-to-one user/profile lifecycle, and cascade
//! ownership. It is consumed by an embedding application (web API, CLI,
//! migration tooling); no HTTP surface lives here.
//!
//! Layers:
//! - [`models`]: entity structs and input types
//! - [`db`]: SQLite pool, embedded migrations, per-entity repositories
//! - [`services`]: business rules on top of the repositories

pub mod config;
pub mod db;
pub mod models;
pub mod services;

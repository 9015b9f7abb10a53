//! Rollbook-DB: Table descriptors and idempotent schema bootstrap.
//!
//! This crate turns explicit table descriptors into SQLite tables using
//! rusqlite. Tables that already exist are never altered.
//!
//! # Modules
//!
//! - `schema` - Table and column descriptors, validation, DDL rendering
//! - `store` - Opening SQLite stores
//! - `bootstrap` - Creating missing tables
//! - `inspect` - Reading back the tables and columns of a store
//! - `models` - The application's entities
//!
//! # Example
//!
//! ```no_run
//! use rollbook_common::StoreLocation;
//! use rollbook_db::bootstrap::ensure_schema;
//! use rollbook_db::models::entities;
//!
//! let location: StoreLocation = "students.db".parse().unwrap();
//! let report = ensure_schema(&location, &entities()).unwrap();
//! println!("Created: {:?}", report.created());
//! ```

pub mod bootstrap;
pub mod inspect;
pub mod models;
pub mod schema;
pub mod store;

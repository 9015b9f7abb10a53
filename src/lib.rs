//! Rollbook - Student roll schema bootstrapper
//!
//! This library crate holds configuration loading for the `rollbook` binary.
//! The schema itself lives in `rollbook-db`.

pub mod config;

//! Rollbook-Common: Shared error type and store-location parsing.
//!
//! This crate provides the pieces used by every other rollbook crate:
//!
//! - **Error Handling**: The common error type and result alias
//! - **Store Locations**: Parsing of file paths and `sqlite://` URLs
//!
//! # Examples
//!
//! ```
//! use rollbook_common::{Error, Result, StoreLocation};
//! use std::path::PathBuf;
//!
//! let location: StoreLocation = "sqlite:///students.db".parse().unwrap();
//! assert_eq!(location, StoreLocation::File(PathBuf::from("students.db")));
//!
//! fn example() -> Result<()> {
//!     Err(Error::storage("unable to open database file"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod location;

pub use error::{Error, Result};
pub use location::StoreLocation;

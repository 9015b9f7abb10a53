//! Store location parsing.
//!
//! A store location is either a filesystem path or a `sqlite://` URL in the
//! form used by most SQL toolkits:
//!
//! | Input                  | Location                 |
//! |------------------------|--------------------------|
//! | `students.db`          | `File("students.db")`    |
//! | `sqlite:///rel.db`     | `File("rel.db")`         |
//! | `sqlite:////abs/x.db`  | `File("/abs/x.db")`      |
//! | `sqlite://`            | `Memory`                 |
//! | `:memory:`             | `Memory`                 |
//!
//! Query parameters (`sqlite:///x.db?mode=ro`) are rejected rather than
//! becoming part of the file name. Plain paths are never read as SQLite
//! `file:` URIs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{Error, Result};

const SQLITE_SCHEME: &str = "sqlite://";
const MEMORY: &str = ":memory:";

/// Where a SQLite store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file, created on first open.
    File(PathBuf),
    /// A private in-memory database, gone when the connection closes.
    Memory,
}

impl StoreLocation {
    /// Parse a store identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollbook_common::StoreLocation;
    /// use std::path::PathBuf;
    ///
    /// let loc = StoreLocation::parse("sqlite:////var/lib/rollbook/students.db").unwrap();
    /// assert_eq!(loc, StoreLocation::File(PathBuf::from("/var/lib/rollbook/students.db")));
    /// assert_eq!(StoreLocation::parse("sqlite://").unwrap(), StoreLocation::Memory);
    /// assert!(StoreLocation::parse("postgres://localhost/db").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::invalid_input("store location is empty"));
        }

        if input == MEMORY {
            return Ok(Self::Memory);
        }

        if let Some(rest) = input.strip_prefix(SQLITE_SCHEME) {
            if rest.is_empty() {
                return Ok(Self::Memory);
            }
            // The host part must be empty: `sqlite:///path`
            let path = rest.strip_prefix('/').ok_or_else(|| {
                Error::invalid_input(format!(
                    "sqlite URL must have an empty host (sqlite:///path): {}",
                    input
                ))
            })?;
            if path.contains('?') {
                return Err(Error::invalid_input(format!(
                    "sqlite URL query parameters are not supported: {}",
                    input
                )));
            }
            return match path {
                "" => Err(Error::invalid_input(format!(
                    "sqlite URL has no database path: {}",
                    input
                ))),
                MEMORY => Ok(Self::Memory),
                _ => Ok(Self::File(PathBuf::from(path))),
            };
        }

        if let Some((scheme, _)) = input.split_once("://") {
            return Err(Error::invalid_input(format!(
                "unsupported store scheme '{}': only sqlite is supported",
                scheme
            )));
        }

        Ok(Self::File(PathBuf::from(input)))
    }

    /// The database file path, if this location is file-backed.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Memory => None,
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl FromStr for StoreLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => f.write_str(MEMORY),
        }
    }
}

impl From<PathBuf> for StoreLocation {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for StoreLocation {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

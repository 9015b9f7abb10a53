//! Common error types used throughout rollbook.
//!
//! `Storage` is the single category for everything the storage engine
//! reports: connection failures, permission failures and DDL errors. The
//! engine's message is carried as-is.

/// Common error type for rollbook.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The storage engine failed to open the store or execute a statement.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An entity definition is malformed.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new Storage error.
    pub fn storage<S: ToString>(msg: S) -> Self {
        Self::Storage(msg.to_string())
    }

    /// Create a new InvalidSchema error.
    pub fn invalid_schema<S: Into<String>>(msg: S) -> Self {
        Self::InvalidSchema(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error came from the storage engine.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

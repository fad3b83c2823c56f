//! Error types for the trading desk
//!
//! This module provides the error type shared by every crate in the
//! workspace. Service crates return [`Result`] and the API gateway maps each
//! variant onto an HTTP status.

use thiserror::Error;

/// Trading desk error type
#[derive(Debug, Error)]
pub enum Error {
    /// The order names a symbol that is not a registered instrument
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::UnknownSymbol(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::UnknownSymbol("DOGE".to_string()).is_client_error());
        assert!(!Error::Database(sqlx::Error::PoolTimedOut).is_client_error());
        assert!(!Error::Internal("boom".to_string()).is_client_error());
    }
}

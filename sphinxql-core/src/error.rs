//! Error types for SphinxQL

use thiserror::Error;

/// The main error type for SphinxQL operations
#[derive(Error, Debug)]
pub enum Error {
    /// A builder was asked to be both VALUES-based and SELECT-based
    #[error("Kind conflict: {message}")]
    KindConflict { message: String },

    /// Condition group brackets do not balance
    #[error("Malformed condition group: {message}")]
    MalformedGroup { message: String },

    /// The builder has no query kind with a compile routine
    #[error("Unsupported query kind: no statement type was set on the builder")]
    UnsupportedKind,

    /// The daemon rejected the statement
    #[error("Query failed [{code}]: {message}")]
    QueryFailed { message: String, code: u32 },

    /// Invalid query configuration
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Connection settings could not be read
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport error that carries no server error code
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience Result type for SphinxQL operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new kind conflict error
    pub fn kind_conflict(message: impl Into<String>) -> Self {
        Self::KindConflict {
            message: message.into(),
        }
    }

    /// Create a new malformed group error
    pub fn malformed_group(message: impl Into<String>) -> Self {
        Self::MalformedGroup {
            message: message.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new query failed error from the server message and code
    pub fn query_failed(message: impl Into<String>, code: u32) -> Self {
        Self::QueryFailed {
            message: message.into(),
            code,
        }
    }

    /// Server error code, when the daemon reported one
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::QueryFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conflict_error() {
        let err = Error::kind_conflict("VALUES after SELECT");
        assert!(matches!(err, Error::KindConflict { .. }));
        assert_eq!(err.to_string(), "Kind conflict: VALUES after SELECT");
    }

    #[test]
    fn test_malformed_group_error() {
        let err = Error::malformed_group("1 unclosed group(s) in WHERE");
        assert!(matches!(err, Error::MalformedGroup { .. }));
        assert_eq!(
            err.to_string(),
            "Malformed condition group: 1 unclosed group(s) in WHERE"
        );
    }

    #[test]
    fn test_query_failed_error() {
        let err = Error::query_failed("index products: no such index", 1064);
        assert_eq!(err.code(), Some(1064));
        assert_eq!(
            err.to_string(),
            "Query failed [1064]: index products: no such index"
        );
    }

    #[test]
    fn test_invalid_query_error() {
        let err = Error::invalid_query("BETWEEN needs two bounds");
        assert!(matches!(err, Error::InvalidQuery { .. }));
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "Invalid query: BETWEEN needs two bounds");
    }
}

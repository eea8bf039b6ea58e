//! Error handling for the Math-Lock client
//!
//! One error type covers the REST client, the database wrapper and config loading,
//! so every public operation returns the same `Result`.

use thiserror::Error;

/// Math-Lock client error
#[derive(Debug, Error)]
pub enum MathLockError {
    /// Transport failure talking to the REST API
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Error reported by PostgreSQL or the connection
    #[cfg(feature = "db")]
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Caller-supplied input rejected before anything was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Math-Lock operations
pub type Result<T> = std::result::Result<T, MathLockError>;

/// Create a `MathLockError::InvalidInput` with format string support
macro_rules! invalid_input {
    ($($arg:tt)*) => {
        $crate::error::MathLockError::InvalidInput(format!($($arg)*))
    };
}

pub(crate) use invalid_input;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = invalid_input!("table name {:?} is not an identifier", "a b");
        assert_eq!(
            err.to_string(),
            "Invalid input: table name \"a b\" is not an identifier"
        );
    }

    #[test]
    fn test_decode_from_serde() {
        let serde_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: MathLockError = serde_err.into();
        assert!(matches!(err, MathLockError::Decode(_)));
        assert!(err.to_string().starts_with("Failed to decode response"));
    }
}

//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its wrappers.
///
/// Lookups never fail: a missing or expired key is a miss, not an error.
/// Errors only come from construction and from key derivation.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Capacity must hold at least one entry
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// A custom key generator rejected its arguments
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Default key generator could not serialize the arguments
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Console input that is not a known command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::InvalidCapacity(0).to_string(),
            "Invalid capacity: 0 (must be at least 1)"
        );
        assert_eq!(
            CacheError::KeyGeneration("bad".to_string()).to_string(),
            "Key generation failed: bad"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: CacheError = err.into();
        assert!(matches!(err, CacheError::Serialization(_)));
    }
}

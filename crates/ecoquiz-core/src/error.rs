//! Error types for the persistence port and survey validation.
//!
//! Storage errors never reach callers of the profile store: the store logs
//! them and carries on with in-memory state. They are still typed so storage
//! backends and their tests can tell failures apart.

use thiserror::Error;

/// Errors that can occur while reading or writing a stored profile blob.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium failed.
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The profile could not be serialized.
    #[error("failed to serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The key cannot be mapped onto the backend (e.g. contains a path separator).
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

impl StorageError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }

    /// Returns the storage key involved, if the error is tied to one.
    pub fn key(&self) -> Option<&str> {
        match self {
            StorageError::Io { key, .. } | StorageError::InvalidKey(key) => Some(key),
            StorageError::Serialize(_) => None,
        }
    }
}

/// Survey answers that cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferencesError {
    #[error("at least one interest must be selected")]
    NoInterests,

    #[error("age must be between 1 and 120, got {0}")]
    InvalidAge(u32),
}

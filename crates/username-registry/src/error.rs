//! Error types for the username registry

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the username registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Generation codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Persistence failed, registration not durable: {0}")]
    Persistence(String),
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors decoding the generation file binary format
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Truncated header at offset {offset}: need 12 bytes, have {available}")]
    TruncatedHeader { offset: usize, available: usize },

    #[error("Truncated bit storage at offset {offset}: need {expected} bytes, have {available}")]
    TruncatedBody {
        offset: usize,
        expected: usize,
        available: usize,
    },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Empty generation file")]
    Empty,
}

/// Errors from the cache layer
///
/// Never fatal: the service degrades to registry-only lookups.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout")]
    Timeout,
}

/// Errors from the profile directory collaborator
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile directory unavailable: {0}")]
    Unavailable(String),
}

/// Errors validating an inbound request before it reaches the service
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Malformed request: {0}")]
    Malformed(String),

    #[error("Name is {length} bytes, maximum is {max}")]
    NameTooLarge { length: usize, max: usize },

    #[error("Identity must be between 1 and {max} bytes, got {length}")]
    InvalidIdentity { length: usize, max: usize },
}

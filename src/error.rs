//! Error Taxonomy
//!
//! Crate-wide error type shared by the store backends, the query service
//! and the HTTP layer.
//!
//! A word that is simply absent from the vocabulary is never an error:
//! lookups drop it from the result map and distance queries report the
//! infinite sentinel instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied a blank or malformed argument. Raised before any I/O.
    #[error("invalid input: {0}")]
    Input(String),

    /// Vector backend unreachable or connection lost mid-request.
    #[error("store connection error: {0}")]
    Connection(String),

    /// Stored vector or embedding file is malformed (wrong dimension,
    /// truncated payload). Indicates an upstream ingestion bug.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// Wire protocol violation from the key-value service.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Custom error types for the common library
//!
//! Every document store operation resolves to a [`StoreResult`], so callers can
//! tell a bad identifier from a missing document from an unreachable server.

use thiserror::Error;

/// Custom error type for document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A caller-supplied identifier is not a well-formed object id
    #[error("Invalid document id: {0}")]
    InvalidId(String),

    /// The addressed document does not exist
    #[error("Document not found")]
    NotFound,

    /// The requested operation cannot be applied to the stored data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A write collided with an existing document
    #[error("Conflicting write: {0}")]
    Conflict(String),

    /// The store could not be reached or the driver failed
    #[error("Document store unavailable: {0}")]
    Unavailable(#[source] mongodb::error::Error),

    /// A server-side value could not be turned into a document
    #[error("Document conversion error: {0}")]
    Conversion(String),

    /// Configuration error
    #[error("Document store configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

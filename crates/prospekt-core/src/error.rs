//! Error types for the persistence boundary.

use thiserror::Error;

use crate::lead::LeadId;

/// Errors surfaced by [`LeadStore`](crate::store::LeadStore) backends.
///
/// Malformed field values are never an error at this layer; empty and
/// missing fields are valid lead data. Only the storage backend itself can
/// fail.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced lead does not exist.
    #[error("lead not found: {0}")]
    NotFound(LeadId),

    /// The backend could not serve the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

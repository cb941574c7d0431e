//! Error types for the deduplication engine.

use thiserror::Error;

use prospekt_core::StoreError;

/// Configuration validation failure.
///
/// The only fatal error class in the engine: bad lead data is never an
/// error, but a misconfigured threshold would silently corrupt every
/// classification, so construction refuses it.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A similarity or confidence threshold fell outside `[0, 1]`.
    #[error("{name} threshold must be within [0.0, 1.0], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    /// The guard's merge boundary exceeds its reject boundary.
    #[error("merge confidence {merge} must not exceed reject confidence {reject}")]
    InvertedConfidenceBands { merge: f64, reject: f64 },

    /// The recent-lead cache cannot be empty.
    #[error("cache size must be non-zero")]
    ZeroCacheSize,

    /// A TTL or timeout was zero.
    #[error("{name} must be a non-zero duration")]
    ZeroDuration { name: &'static str },
}

/// Runtime errors from the cleaner and guard persistence paths.
#[derive(Debug, Error)]
pub enum DedupError {
    /// The persistence layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for engine operations.
pub type Result<T, E = DedupError> = std::result::Result<T, E>;

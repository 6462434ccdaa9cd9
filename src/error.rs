//! Error kinds for the matching engine.
//!
//! Failure policy differs by kind (fail-fast vs. skip-and-count vs. fail-closed vs.
//! abort-with-no-results), so the kinds are distinguished in the type rather than by
//! string matching.

use thiserror::Error;

/// Result type alias for matching-engine operations.
pub type Result<T> = std::result::Result<T, NameMatchError>;

#[derive(Debug, Error)]
pub enum NameMatchError {
    /// Empty required path, `dist` returned a value outside `0..=4`, or `min_score`
    /// was outside `0..=100` before clamping.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Query-time open of one of the three stores failed.
    #[error("index missing or unopenable: {0}")]
    IndexMissing(String),

    /// A single NameIndex key produced more payloads than the configured cap; the
    /// score for that query cannot be computed reliably.
    #[error("fan-out limit exceeded for key (got {got}, limit {limit})")]
    IndexFanoutLimit { got: usize, limit: usize },

    /// Cooperative cancellation observed between pipeline stages.
    #[error("operation cancelled")]
    Cancelled,

    /// Unexpected fault in hashing, metaphone, or edit-distance computation.
    #[error("internal error: {0}")]
    Internal(String),

    /// Underlying LMDB failure.
    #[error("storage error: {0}")]
    Storage(#[from] heed::Error),

    /// Underlying filesystem failure (creating store directories, reading a stopword file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter for wrapping a foreign error as [`NameMatchError::Internal`], used at
/// `heed`-call sites.
pub(crate) fn internal<E: std::fmt::Display>(e: E) -> NameMatchError {
    NameMatchError::Internal(e.to_string())
}

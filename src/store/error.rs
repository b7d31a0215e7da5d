//! Evidence store errors.

use thiserror::Error;

/// Errors from the evidence store.
///
/// SQL failures inside `conn.call` closures surface through the
/// `tokio_rusqlite` error, which wraps `rusqlite::Error`, so a single
/// variant covers both layers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database failure, open or query.
    #[error("database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

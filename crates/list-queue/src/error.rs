//! Error types for queue and store operations.

use thiserror::Error;

/// Failure reported by the backing store.
///
/// Every operation that touches the store either succeeds or surfaces one of
/// these; the core performs no retries. Losing a message is never modeled as
/// an error: the receipt ledger and the shutdown sweep handle that case
/// structurally instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("store error: {message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Wrap an underlying failure's message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The underlying failure's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

//! The store-adapter contract consumed by the queue core.
//!
//! A [`QueueStore`] is a named-list store: every queue is one FIFO list under
//! a string key, created implicitly on first push. The queue core only ever
//! drives the list operations; the plain string operations ([`QueueStore::get`],
//! [`QueueStore::set`], [`QueueStore::keys`]) exist for callers that share the
//! store handle for bookkeeping outside the message lifecycle.

use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// List-based store operations backing a queue.
///
/// Implementations must pop atomically: two concurrent [`pop_front`] calls on
/// the same key never observe the same element. That atomic pop is the only
/// coordination between consumers.
///
/// [`pop_front`]: QueueStore::pop_front
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Remove the list at `key`. Returns the number of keys removed (0 or 1).
    async fn delete(&self, key: &str) -> Result<u64, StoreError>;

    /// Prepend `value` to the head of the list at `key`, creating the list if
    /// absent. Returns the new list length.
    async fn push_front(&self, key: &str, value: &str) -> Result<u64, StoreError>;

    /// Append `value` to the tail of the list at `key`, creating the list if
    /// absent. Returns the new list length.
    async fn push_back(&self, key: &str, value: &str) -> Result<u64, StoreError>;

    /// Pop the head element of the list at `key`, waiting up to `timeout` for
    /// one to appear. Returns the `(key, value)` pair, or `None` if the wait
    /// elapsed with the list still empty.
    ///
    /// A zero timeout follows the store's own convention: the Redis store
    /// blocks indefinitely (BLPOP semantics), the in-memory store polls once
    /// and returns immediately.
    async fn pop_front(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<(String, String)>, StoreError>;

    /// Current length of the list at `key`; 0 for a missing key.
    async fn len(&self, key: &str) -> Result<u64, StoreError>;

    /// Read the string value at `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a string value at `key`. Returns `false` when a conditional
    /// write (see [`SetCondition`]) was refused.
    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<bool, StoreError>;

    /// List keys matching a glob-style pattern (a trailing `*` matches any
    /// suffix).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}

/// Expiry for a stored string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Seconds(u64),
    Milliseconds(u64),
}

impl Expiry {
    pub(crate) fn as_duration(&self) -> Duration {
        match self {
            Expiry::Seconds(secs) => Duration::from_secs(*secs),
            Expiry::Milliseconds(millis) => Duration::from_millis(*millis),
        }
    }
}

/// Condition under which a [`QueueStore::set`] is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCondition {
    /// Only write when the key does not exist yet.
    IfNotExists,
    /// Only write when the key already exists.
    IfExists,
}

/// Options for [`QueueStore::set`].
///
/// A typed options struct; stores translate it to their native write
/// modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    expiry: Option<Expiry>,
    condition: Option<SetCondition>,
    keep_ttl: bool,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire the value after the given time.
    pub fn with_expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Apply the write only under the given condition.
    pub fn with_condition(mut self, condition: SetCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Retain the key's existing expiry instead of clearing it.
    pub fn with_keep_ttl(mut self) -> Self {
        self.keep_ttl = true;
        self
    }

    pub fn expiry(&self) -> Option<Expiry> {
        self.expiry
    }

    pub fn condition(&self) -> Option<SetCondition> {
        self.condition
    }

    pub fn keep_ttl(&self) -> bool {
        self.keep_ttl
    }
}

//! In-memory store implementation for testing and development.
//!
//! Fully functional stand-in for the Redis store: FIFO lists with blocking
//! pops, plus the string table with conditional writes and expiries. State
//! lives in the process and disappears with it.

use crate::error::StoreError;
use crate::store::{QueueStore, SetCondition, SetOptions};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

struct StringEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl StringEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

#[derive(Default)]
struct Tables {
    lists: HashMap<String, VecDeque<String>>,
    strings: HashMap<String, StringEntry>,
}

impl Tables {
    /// Lazy expiry: a dead string entry behaves as if the key never existed.
    fn purge_if_expired(&mut self, key: &str) {
        if self.strings.get(key).is_some_and(StringEntry::is_expired) {
            self.strings.remove(key);
        }
    }
}

/// Thread-safe in-memory [`QueueStore`].
///
/// Blocked [`pop_front`](QueueStore::pop_front) callers are woken by any
/// push. A zero timeout polls once and returns immediately, unlike the Redis
/// store, where zero blocks indefinitely.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    pushed: Notify,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            pushed: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wrong_type(key: &str) -> StoreError {
        StoreError::new(format!(
            "WRONGTYPE operation against a key holding the wrong kind of value: {key}"
        ))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn delete(&self, key: &str) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        tables.purge_if_expired(key);
        let removed_list = tables.lists.remove(key).is_some();
        let removed_string = tables.strings.remove(key).is_some();
        Ok(u64::from(removed_list || removed_string))
    }

    async fn push_front(&self, key: &str, value: &str) -> Result<u64, StoreError> {
        let length = {
            let mut tables = self.lock();
            tables.purge_if_expired(key);
            if tables.strings.contains_key(key) {
                return Err(Self::wrong_type(key));
            }
            let list = tables.lists.entry(key.to_string()).or_default();
            list.push_front(value.to_string());
            list.len() as u64
        };
        self.pushed.notify_waiters();
        Ok(length)
    }

    async fn push_back(&self, key: &str, value: &str) -> Result<u64, StoreError> {
        let length = {
            let mut tables = self.lock();
            tables.purge_if_expired(key);
            if tables.strings.contains_key(key) {
                return Err(Self::wrong_type(key));
            }
            let list = tables.lists.entry(key.to_string()).or_default();
            list.push_back(value.to_string());
            list.len() as u64
        };
        self.pushed.notify_waiters();
        Ok(length)
    }

    async fn pop_front(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<(String, String)>, StoreError> {
        let deadline = (!timeout.is_zero()).then(|| Instant::now() + timeout);

        loop {
            let notified = self.pushed.notified();
            tokio::pin!(notified);
            // Register for wakeups before checking, so a push landing between
            // the check and the await is not missed.
            notified.as_mut().enable();

            {
                let mut tables = self.lock();
                tables.purge_if_expired(key);
                if tables.strings.contains_key(key) {
                    return Err(Self::wrong_type(key));
                }
                if let Some(list) = tables.lists.get_mut(key) {
                    if let Some(value) = list.pop_front() {
                        if list.is_empty() {
                            tables.lists.remove(key);
                        }
                        return Ok(Some((key.to_string(), value)));
                    }
                }
            }

            let Some(deadline) = deadline else {
                return Ok(None);
            };
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            if tokio::time::timeout(deadline - now, notified).await.is_err() {
                return Ok(None);
            }
        }
    }

    async fn len(&self, key: &str) -> Result<u64, StoreError> {
        let mut tables = self.lock();
        tables.purge_if_expired(key);
        if tables.strings.contains_key(key) {
            return Err(Self::wrong_type(key));
        }
        Ok(tables.lists.get(key).map_or(0, |list| list.len() as u64))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut tables = self.lock();
        tables.purge_if_expired(key);
        if tables.lists.contains_key(key) {
            return Err(Self::wrong_type(key));
        }
        Ok(tables.strings.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        tables.purge_if_expired(key);
        if tables.lists.contains_key(key) {
            return Err(Self::wrong_type(key));
        }

        let exists = tables.strings.contains_key(key);
        let refused = match options.condition() {
            Some(SetCondition::IfNotExists) => exists,
            Some(SetCondition::IfExists) => !exists,
            None => false,
        };
        if refused {
            return Ok(false);
        }

        let expires_at = if options.keep_ttl() {
            tables.strings.get(key).and_then(|entry| entry.expires_at)
        } else {
            options
                .expiry()
                .map(|expiry| Instant::now() + expiry.as_duration())
        };
        tables.strings.insert(
            key.to_string(),
            StringEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(true)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut tables = self.lock();
        tables.strings.retain(|_, entry| !entry.is_expired());

        let matches = |key: &str| match pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == pattern,
        };
        let mut found: Vec<String> = tables
            .lists
            .keys()
            .chain(tables.strings.keys())
            .filter(|key| matches(key))
            .cloned()
            .collect();
        found.sort();
        Ok(found)
    }
}

//! # List Queue
//!
//! An at-least-once message queue layered on a key-value store's list
//! primitives. Producers append to the tail of a named list, consumers pop
//! from its head, and every popped message is tracked in an in-memory receipt
//! ledger until it is acknowledged or handed back.
//!
//! The lifecycle per message:
//!
//! ```text
//! store list ──receive──▶ in-flight (receipt ledger) ──complete──▶ gone
//!     ▲                        │
//!     └───────return───────────┘        (head of the list, redelivered first)
//! ```
//!
//! Consumers that stop, cleanly or not, call [`Queue::close`], which pushes
//! every still-outstanding message back to the head of its queue. A crashed
//! consumer therefore delays its messages rather than losing them. Delivery
//! is at-least-once: a message returned after partial processing will be seen
//! again.
//!
//! ## Module Organization
//!
//! - [`error`] - The store failure type
//! - [`message`] - Message, receipt, and factory types
//! - [`store`] - The store-adapter contract and write options
//! - [`stores`] - Redis and in-memory store implementations
//! - [`config`] - Redis connection configuration
//! - [`queue`] - The message lifecycle core
//!
//! ## Example
//!
//! ```ignore
//! use list_queue::{Queue, RedisConfig, RedisStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(RedisStore::from_config(&RedisConfig::new("127.0.0.1"))?);
//! let queue = Queue::new(store, "orders").with_wait_time(Duration::from_secs(5));
//!
//! queue.send_message("order-1", None).await?;
//! if let Some(message) = queue.receive_message(None, None).await? {
//!     // ... process ...
//!     queue.complete_message(&message);
//! }
//! queue.close().await?;
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod queue;
pub mod store;
pub mod stores;

// Re-export commonly used types at crate root for convenience
pub use config::RedisConfig;
pub use error::StoreError;
pub use message::{DefaultMessageFactory, MessageFactory, QueueMessage, ReceiptId};
pub use queue::{Queue, QueueOptions};
pub use store::{Expiry, QueueStore, SetCondition, SetOptions};
pub use stores::{MemoryStore, RedisStore};

//! Store implementations.

mod memory;
mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

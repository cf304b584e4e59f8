//! Redis store implementation.
//!
//! Maps the store contract onto Redis list and string commands: DEL, LPUSH,
//! RPUSH, BLPOP, LLEN, GET, SET, KEYS. The connection is established lazily
//! (building the store performs no I/O, the first operation connects) and is
//! held as a [`ConnectionManager`], which multiplexes commands and reconnects
//! on failure.

use crate::config::RedisConfig;
use crate::error::StoreError;
use crate::store::{Expiry, QueueStore, SetCondition, SetOptions};
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, ToRedisArgs};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

#[cfg(test)]
#[path = "redis_tests.rs"]
mod tests;

/// Redis-backed [`QueueStore`].
///
/// A zero `pop_front` timeout blocks indefinitely, per BLPOP semantics.
pub struct RedisStore {
    client: redis::Client,
    manager_config: ConnectionManagerConfig,
    connection: OnceCell<ConnectionManager>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("client", &self.client)
            .field("connection_initialized", &self.connection.initialized())
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Wrap an already-built client.
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            manager_config: ConnectionManagerConfig::new(),
            connection: OnceCell::new(),
        }
    }

    /// Build a store from configuration.
    ///
    /// Validates the parameters and constructs the client; no connection is
    /// made until the first operation.
    pub fn from_config(config: &RedisConfig) -> Result<Self, StoreError> {
        if config.host.is_empty() {
            return Err(StoreError::new(
                "cannot create Redis client: no host supplied",
            ));
        }

        let client = redis::Client::open(connection_info(config))?;

        let mut manager_config = ConnectionManagerConfig::new();
        if let Some(timeout) = config.connect_timeout {
            manager_config = manager_config.set_connection_timeout(timeout);
        }
        if let Some(timeout) = config.response_timeout {
            manager_config = manager_config.set_response_timeout(timeout);
        }

        Ok(Self {
            client,
            manager_config,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, StoreError> {
        let manager = self
            .connection
            .get_or_try_init(|| {
                debug!(addr = %self.client.get_connection_info().addr, "connecting to Redis");
                ConnectionManager::new_with_config(self.client.clone(), self.manager_config.clone())
            })
            .await?;
        Ok(manager.clone())
    }
}

fn connection_info(config: &RedisConfig) -> ConnectionInfo {
    let addr = if config.use_tls {
        ConnectionAddr::TcpTls {
            host: config.host.clone(),
            port: config.port,
            insecure: false,
            tls_params: None,
        }
    } else {
        ConnectionAddr::Tcp(config.host.clone(), config.port)
    };

    ConnectionInfo {
        addr,
        redis: RedisConnectionInfo {
            db: config.database,
            username: config.username.clone(),
            password: config.password.clone(),
            ..Default::default()
        },
    }
}

#[async_trait]
impl QueueStore for RedisStore {
    async fn delete(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let removed: u64 = conn.del(key).await?;
        Ok(removed)
    }

    async fn push_front(&self, key: &str, value: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let length: u64 = conn.lpush(key, value).await?;
        debug!(key = %key, length, "LPUSH");
        Ok(length)
    }

    async fn push_back(&self, key: &str, value: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let length: u64 = conn.rpush(key, value).await?;
        debug!(key = %key, length, "RPUSH");
        Ok(length)
    }

    async fn pop_front(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<(String, String)>, StoreError> {
        let mut conn = self.connection().await?;
        let popped: Option<(String, String)> = conn.blpop(key, timeout.as_secs_f64()).await?;
        Ok(popped)
    }

    async fn len(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.connection().await?;
        let length: u64 = conn.llen(key).await?;
        Ok(length)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<bool, StoreError> {
        let mut conn = self.connection().await?;
        // SET replies OK, or Nil when a conditional write was refused.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg(options)
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }
}

impl ToRedisArgs for SetOptions {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + redis::RedisWrite,
    {
        match self.expiry() {
            Some(Expiry::Seconds(seconds)) => {
                out.write_arg(b"EX");
                out.write_arg_fmt(seconds);
            }
            Some(Expiry::Milliseconds(millis)) => {
                out.write_arg(b"PX");
                out.write_arg_fmt(millis);
            }
            None => {}
        }
        if self.keep_ttl() {
            out.write_arg(b"KEEPTTL");
        }
        match self.condition() {
            Some(SetCondition::IfNotExists) => out.write_arg(b"NX"),
            Some(SetCondition::IfExists) => out.write_arg(b"XX"),
            None => {}
        }
    }
}

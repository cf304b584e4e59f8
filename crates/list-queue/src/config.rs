//! Redis client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection parameters for the Redis store.
///
/// A typed replacement for loosely-keyed client parameter maps: host and port
/// address the server, the optional credential pair is sent as AUTH, and
/// `use_tls` switches the connection to TLS. Timeouts are optional; when unset
/// the client waits indefinitely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub database: i64,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
    pub connect_timeout: Option<Duration>,
    pub response_timeout: Option<Duration>,
}

impl RedisConfig {
    /// Configuration for a server at `host` with everything else defaulted.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Select a logical database index.
    pub fn with_database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }

    /// Authenticate with a username and password pair.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Authenticate with a password only (legacy AUTH).
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Connect over TLS.
    pub fn with_tls(mut self) -> Self {
        self.use_tls = true;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            database: 0,
            username: None,
            password: None,
            use_tls: false,
            connect_timeout: None,
            response_timeout: None,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

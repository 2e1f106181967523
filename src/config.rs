//! Connection configuration
//!
//! Immutable connection parameters with sensible defaults. Built once by the
//! caller and handed to [`RedisClient`](crate::RedisClient); never mutated
//! afterwards.

use serde::{Deserialize, Serialize};

/// Parameters for connecting to a Redis server
///
/// The defaults describe an unauthenticated plain connection to a local
/// server on the default port, with no timeouts (the transport decides).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParams {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    /// Server hostname or IP address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------
    /// Username for ACL-style authentication (requires `password` too)
    pub username: Option<String>,

    /// Password; used alone for legacy AUTH when no username is set
    pub password: Option<String>,

    // -------------------------------------------------------------------------
    // Connection Behaviour
    // -------------------------------------------------------------------------
    /// Whether to use a persistent (named, reusable) connection
    pub persistent: bool,

    /// Connect timeout in seconds (0 = transport default)
    pub connect_timeout_secs: u64,

    /// Interval between dial retries in seconds (0 = no retry)
    pub retry_interval_secs: u64,

    /// Read timeout in seconds (0.0 = no timeout)
    pub read_timeout_secs: f64,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            username: None,
            password: None,
            persistent: false,
            connect_timeout_secs: 0,
            retry_interval_secs: 0,
            read_timeout_secs: 0.0,
        }
    }
}

impl ConnectionParams {
    /// Create parameters for the given endpoint with default behaviour
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Create a new parameter builder
    pub fn builder() -> ConnectionParamsBuilder {
        ConnectionParamsBuilder::default()
    }
}

// Credentials are kept out of Debug output.
impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("persistent", &self.persistent)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}

/// Builder for ConnectionParams
#[derive(Default)]
pub struct ConnectionParamsBuilder {
    params: ConnectionParams,
}

impl ConnectionParamsBuilder {
    /// Set the server hostname or IP address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.params.host = host.into();
        self
    }

    /// Set the server TCP port
    pub fn port(mut self, port: u16) -> Self {
        self.params.port = port;
        self
    }

    /// Set the username for ACL-style authentication
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.params.username = Some(username.into());
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.params.password = Some(password.into());
        self
    }

    /// Whether to use a persistent connection
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.params.persistent = persistent;
        self
    }

    /// Set the connect timeout (in seconds)
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.params.connect_timeout_secs = secs;
        self
    }

    /// Set the dial retry interval (in seconds)
    pub fn retry_interval_secs(mut self, secs: u64) -> Self {
        self.params.retry_interval_secs = secs;
        self
    }

    /// Set the read timeout (in seconds)
    pub fn read_timeout_secs(mut self, secs: f64) -> Self {
        self.params.read_timeout_secs = secs;
        self
    }

    pub fn build(self) -> ConnectionParams {
        self.params
    }
}

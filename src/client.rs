//! Redis client
//!
//! Owns the transport and the lazy connection lifecycle: the connection is
//! established at most once per client, on the first dispatched command.
//! Every command is executed with literal reply decoding forced, because the
//! module replies mix booleans, integers and nested arrays and coercion would
//! corrupt the type information the adapters decode against.

use std::time::Duration;

use parking_lot::Mutex;

use crate::config::ConnectionParams;
use crate::error::{RebloomError, Result};
use crate::reply::Reply;
use crate::transport::{Arg, Credentials, Transport, TransportOption};

/// Client over a single lazily-established connection
///
/// The transport sits behind a mutex, so the connect-if-needed check and the
/// dial are atomic and a shared client can be used from several threads
/// (commands serialize on the one connection).
pub struct RedisClient<T: Transport> {
    transport: Mutex<T>,
    params: ConnectionParams,
}

impl<T: Transport> RedisClient<T> {
    /// Create a client; no connection is made until the first command
    pub fn new(transport: T, params: ConnectionParams) -> Self {
        Self {
            transport: Mutex::new(transport),
            params,
        }
    }

    /// The parameters this client connects with
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Execute one command vector and return the raw reply
    ///
    /// Connects first if needed. Transport failures propagate unmodified;
    /// no retry is performed at this layer.
    pub fn execute(&self, args: &[Arg]) -> Result<Reply> {
        let mut transport = self.transport.lock();
        self.connect_if_needed(&mut transport)?;
        transport.set_option(TransportOption::ReplyLiteral, true)?;
        transport.send_command(args)
    }

    /// Establish the connection once; a no-op when already connected
    fn connect_if_needed(&self, transport: &mut T) -> Result<()> {
        if transport.is_connected() {
            return Ok(());
        }

        let params = &self.params;
        let connect_timeout = Duration::from_secs(params.connect_timeout_secs);
        let retry_interval = Duration::from_secs(params.retry_interval_secs);
        let read_timeout = Duration::from_secs_f64(params.read_timeout_secs.max(0.0));

        tracing::debug!(
            "connecting to {}:{} (persistent: {})",
            params.host,
            params.port,
            params.persistent
        );

        let connected = if params.persistent {
            transport.connect_persistent(
                &params.host,
                params.port,
                connect_timeout,
                &local_hostname(),
                retry_interval,
                read_timeout,
            )?
        } else {
            transport.connect(
                &params.host,
                params.port,
                connect_timeout,
                retry_interval,
                read_timeout,
            )?
        };

        if !connected {
            let message = transport
                .last_error()
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::warn!(
                "connection to {}:{} failed: {}",
                params.host,
                params.port,
                message
            );
            return Err(RebloomError::Connection {
                host: params.host.clone(),
                port: params.port,
                message,
            });
        }

        // Auth failures surface through the transport on the next command;
        // they are not classified separately from other transport errors.
        if let (Some(username), Some(password)) = (&params.username, &params.password) {
            transport.auth(&Credentials::UserPassword {
                username: username.clone(),
                password: password.clone(),
            })?;
        } else if let Some(password) = &params.password {
            transport.auth(&Credentials::Password(password.clone()))?;
        }

        Ok(())
    }
}

/// Naming hint for persistent connections
fn local_hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

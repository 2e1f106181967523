//! Transport Module
//!
//! The dependency interface between the client and the underlying Redis
//! connection, plus the bundled RESP implementation.
//!
//! ## Architecture
//! - [`Transport`] is the seam: connect (plain or persistent), authenticate,
//!   force literal reply decoding, dispatch a command vector
//! - [`RespTransport`] speaks RESP2 over a blocking TCP stream
//! - Tests substitute a scripted mock at the same seam

mod resp;

pub use resp::{encode_command, read_reply, RespTransport};

use std::borrow::Cow;
use std::time::Duration;

use crate::error::Result;
use crate::reply::Reply;

/// A positional command argument, stringified per the wire format
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Text argument (command names, keys, items, labels)
    Str(String),

    /// Integer argument (capacities, dimensions, weights, deltas)
    Int(i64),

    /// Floating-point argument (error rates, probabilities)
    Float(f64),

    /// Binary argument (dump chunks)
    Bytes(Vec<u8>),
}

impl Arg {
    /// Wire representation of the argument
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Arg::Str(s) => Cow::Borrowed(s.as_bytes()),
            Arg::Int(n) => Cow::Owned(n.to_string().into_bytes()),
            Arg::Float(f) => Cow::Owned(f.to_string().into_bytes()),
            Arg::Bytes(b) => Cow::Borrowed(b),
        }
    }
}

impl std::fmt::Display for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(n) => write!(f, "{}", n),
            Arg::Float(v) => write!(f, "{}", v),
            Arg::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl From<u64> for Arg {
    fn from(n: u64) -> Self {
        Arg::Int(n as i64)
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(b: Vec<u8>) -> Self {
        Arg::Bytes(b)
    }
}

/// Credentials for server authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Legacy password-only AUTH
    Password(String),

    /// ACL-style AUTH with username and password
    UserPassword { username: String, password: String },
}

/// Tunable transport behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOption {
    /// Return replies literally, with no type coercion
    ///
    /// Module replies mix booleans, integers and nested arrays; coercion
    /// would destroy the type information the adapters decode against.
    ReplyLiteral,
}

/// Connection and dispatch primitives the client builds on
///
/// `connect`/`connect_persistent` return `Ok(false)` when the dial fails in a
/// way the transport can describe via [`last_error`](Transport::last_error);
/// hard I/O faults are returned as errors.
pub trait Transport {
    /// Establish a plain connection
    fn connect(
        &mut self,
        host: &str,
        port: u16,
        connect_timeout: Duration,
        retry_interval: Duration,
        read_timeout: Duration,
    ) -> Result<bool>;

    /// Establish a persistent connection, named by `client_name`
    #[allow(clippy::too_many_arguments)]
    fn connect_persistent(
        &mut self,
        host: &str,
        port: u16,
        connect_timeout: Duration,
        client_name: &str,
        retry_interval: Duration,
        read_timeout: Duration,
    ) -> Result<bool>;

    /// Whether a connection is currently established
    fn is_connected(&self) -> bool;

    /// Authenticate; `Ok(false)` means the server rejected the credentials
    fn auth(&mut self, credentials: &Credentials) -> Result<bool>;

    /// Toggle a transport option
    fn set_option(&mut self, option: TransportOption, enabled: bool) -> Result<()>;

    /// Dispatch one command vector and return the raw reply
    ///
    /// Element 0 is the command name token, the rest are positional
    /// arguments. Server-reported errors come back as [`Reply::Error`];
    /// `Err` is reserved for transport-level failures.
    fn send_command(&mut self, args: &[Arg]) -> Result<Reply>;

    /// Last connection diagnostic reported by the transport, if any
    fn last_error(&self) -> Option<String>;
}

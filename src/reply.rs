//! Raw server reply model
//!
//! The module reply protocol is untyped: depending on the command, the server
//! answers with a boolean, an integer, a string, or an ordered heterogeneous
//! array (possibly nested). [`Reply`] models that as a closed variant type,
//! and the assertion helpers let each adapter demand the shape it expects
//! instead of trusting it implicitly. A shape mismatch is a protocol error;
//! an error reply from the server is classified into a domain error.

use crate::error::{RebloomError, Result};

/// A raw reply as decoded from the wire, with no type coercion applied
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Null reply (`$-1`, `*-1`, or RESP3 `_`)
    Nil,

    /// RESP3 boolean (`#t` / `#f`)
    Bool(bool),

    /// Integer reply (`:`)
    Int(i64),

    /// Simple string reply (`+`)
    Simple(String),

    /// Bulk string reply (`$`); may hold binary data
    Bulk(Vec<u8>),

    /// Array reply (`*`); elements may be of mixed shape
    Array(Vec<Reply>),

    /// Error reply (`-`)
    Error(String),
}

impl Reply {
    /// Short variant name for diagnostics
    fn kind(&self) -> &'static str {
        match self {
            Reply::Nil => "nil",
            Reply::Bool(_) => "boolean",
            Reply::Int(_) => "integer",
            Reply::Simple(_) => "simple string",
            Reply::Bulk(_) => "bulk string",
            Reply::Array(_) => "array",
            Reply::Error(_) => "error",
        }
    }

    /// Expect a boolean reply
    ///
    /// RESP2 servers report booleans as integers 0/1, RESP3 servers as
    /// dedicated boolean tokens; both are accepted.
    pub fn expect_bool(self) -> Result<bool> {
        match self {
            Reply::Bool(b) => Ok(b),
            Reply::Int(0) => Ok(false),
            Reply::Int(1) => Ok(true),
            Reply::Error(message) => Err(RebloomError::from_server(message)),
            other => Err(shape_error("boolean", &other)),
        }
    }

    /// Expect an integer reply
    pub fn expect_int(self) -> Result<i64> {
        match self {
            Reply::Int(n) => Ok(n),
            Reply::Error(message) => Err(RebloomError::from_server(message)),
            other => Err(shape_error("integer", &other)),
        }
    }

    /// Expect a UTF-8 string reply (simple or bulk)
    pub fn expect_string(self) -> Result<String> {
        match self {
            Reply::Simple(s) => Ok(s),
            Reply::Bulk(bytes) => String::from_utf8(bytes)
                .map_err(|e| RebloomError::Protocol(format!("reply is not valid UTF-8: {}", e))),
            Reply::Error(message) => Err(RebloomError::from_server(message)),
            other => Err(shape_error("string", &other)),
        }
    }

    /// Expect a binary bulk string reply
    pub fn expect_bytes(self) -> Result<Vec<u8>> {
        match self {
            Reply::Bulk(bytes) => Ok(bytes),
            Reply::Simple(s) => Ok(s.into_bytes()),
            Reply::Error(message) => Err(RebloomError::from_server(message)),
            other => Err(shape_error("bulk string", &other)),
        }
    }

    /// Expect a success acknowledgement (`+OK` or a true boolean)
    pub fn expect_ok(self) -> Result<bool> {
        match self {
            Reply::Simple(ref s) if s.eq_ignore_ascii_case("ok") => Ok(true),
            Reply::Bool(true) => Ok(true),
            Reply::Error(message) => Err(RebloomError::from_server(message)),
            other => Err(shape_error("OK acknowledgement", &other)),
        }
    }

    /// Expect an array reply
    pub fn expect_array(self) -> Result<Vec<Reply>> {
        match self {
            Reply::Array(items) => Ok(items),
            Reply::Error(message) => Err(RebloomError::from_server(message)),
            other => Err(shape_error("array", &other)),
        }
    }

    /// Expect an array of booleans, preserving element order
    pub fn expect_bool_array(self) -> Result<Vec<bool>> {
        self.expect_array()?
            .into_iter()
            .map(Reply::expect_bool)
            .collect()
    }

    /// Expect an array of integers, preserving element order
    pub fn expect_int_array(self) -> Result<Vec<i64>> {
        self.expect_array()?
            .into_iter()
            .map(Reply::expect_int)
            .collect()
    }
}

fn shape_error(expected: &str, got: &Reply) -> RebloomError {
    RebloomError::Protocol(format!("expected {} reply, got {}", expected, got.kind()))
}

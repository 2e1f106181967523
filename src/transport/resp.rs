//! RESP transport
//!
//! Blocking RESP2 transport over TCP.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg>\r\n   (one per argument)
//! ```
//!
//! ### Reply Format (first byte selects the shape)
//! - `+` simple string
//! - `-` error
//! - `:` integer
//! - `$` bulk string (`$-1` is nil); may hold binary data
//! - `*` array (`*-1` is nil); elements recurse, mixed shapes allowed
//! - `#` boolean, `_` nil (RESP3 servers)

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::{BufMut, BytesMut};

use crate::error::{RebloomError, Result};
use crate::reply::Reply;
use crate::transport::{Arg, Credentials, Transport, TransportOption};

/// Maximum accepted bulk string payload (512 MB, the server-side limit)
pub const MAX_BULK_SIZE: i64 = 512 * 1024 * 1024;

/// Maximum accepted array element count
pub const MAX_ARRAY_LEN: i64 = 1_000_000;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command vector as a RESP array of bulk strings
pub fn encode_command(args: &[Arg]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(16 + args.len() * 16);
    buf.put_u8(b'*');
    buf.put_slice(args.len().to_string().as_bytes());
    buf.put_slice(b"\r\n");

    for arg in args {
        let bytes = arg.to_bytes();
        buf.put_u8(b'$');
        buf.put_slice(bytes.len().to_string().as_bytes());
        buf.put_slice(b"\r\n");
        buf.put_slice(&bytes);
        buf.put_slice(b"\r\n");
    }

    buf.to_vec()
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Read one complete reply from a stream
///
/// Blocks until the reply is complete or an error occurs. Decoding is always
/// literal: no reply shape is ever coerced into another.
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    let line = read_line(reader)?;
    if line.is_empty() {
        return Err(RebloomError::Protocol("empty reply line".to_string()));
    }

    let (prefix, rest) = line.split_at(1);
    match prefix {
        "+" => Ok(Reply::Simple(rest.to_string())),
        "-" => Ok(Reply::Error(rest.to_string())),
        ":" => {
            let n = rest.parse::<i64>().map_err(|_| {
                RebloomError::Protocol(format!("invalid integer reply: {:?}", rest))
            })?;
            Ok(Reply::Int(n))
        }
        "$" => read_bulk(reader, rest),
        "*" => read_array(reader, rest),
        "#" => match rest {
            "t" => Ok(Reply::Bool(true)),
            "f" => Ok(Reply::Bool(false)),
            _ => Err(RebloomError::Protocol(format!(
                "invalid boolean reply: {:?}",
                rest
            ))),
        },
        "_" => Ok(Reply::Nil),
        _ => Err(RebloomError::Protocol(format!(
            "unknown reply type prefix: {:?}",
            prefix
        ))),
    }
}

/// Read a CRLF-terminated line, excluding the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    let n = reader.read_until(b'\n', &mut buf)?;
    if n == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed mid-reply",
        )
        .into());
    }
    if !buf.ends_with(b"\r\n") {
        return Err(RebloomError::Protocol(
            "reply line not CRLF-terminated".to_string(),
        ));
    }
    buf.truncate(buf.len() - 2);
    String::from_utf8(buf)
        .map_err(|e| RebloomError::Protocol(format!("reply line is not valid UTF-8: {}", e)))
}

fn read_bulk<R: BufRead>(reader: &mut R, len: &str) -> Result<Reply> {
    let len = len
        .parse::<i64>()
        .map_err(|_| RebloomError::Protocol(format!("invalid bulk length: {:?}", len)))?;

    if len == -1 {
        return Ok(Reply::Nil);
    }
    if len < 0 || len > MAX_BULK_SIZE {
        return Err(RebloomError::Protocol(format!(
            "bulk length out of range: {}",
            len
        )));
    }

    let mut data = vec![0u8; len as usize + 2];
    reader.read_exact(&mut data)?;
    if !data.ends_with(b"\r\n") {
        return Err(RebloomError::Protocol(
            "bulk string not CRLF-terminated".to_string(),
        ));
    }
    data.truncate(data.len() - 2);
    Ok(Reply::Bulk(data))
}

fn read_array<R: BufRead>(reader: &mut R, len: &str) -> Result<Reply> {
    let len = len
        .parse::<i64>()
        .map_err(|_| RebloomError::Protocol(format!("invalid array length: {:?}", len)))?;

    if len == -1 {
        return Ok(Reply::Nil);
    }
    if len < 0 || len > MAX_ARRAY_LEN {
        return Err(RebloomError::Protocol(format!(
            "array length out of range: {}",
            len
        )));
    }

    let mut items = Vec::with_capacity(len as usize);
    for _ in 0..len {
        items.push(read_reply(reader)?);
    }
    Ok(Reply::Array(items))
}

// =============================================================================
// TCP Transport
// =============================================================================

/// RESP2 transport over a blocking TCP stream
pub struct RespTransport {
    stream: Option<Stream>,
    last_error: Option<String>,
}

/// Split read/write handles over one TCP stream (buffered for efficiency)
struct Stream {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl RespTransport {
    pub fn new() -> Self {
        Self {
            stream: None,
            last_error: None,
        }
    }

    /// Dial the endpoint, with one retry after `retry_interval` if nonzero
    fn dial(
        &mut self,
        host: &str,
        port: u16,
        connect_timeout: Duration,
        retry_interval: Duration,
        read_timeout: Duration,
    ) -> Result<bool> {
        let mut attempt = Self::open(host, port, connect_timeout, read_timeout);
        if attempt.is_err() && !retry_interval.is_zero() {
            std::thread::sleep(retry_interval);
            attempt = Self::open(host, port, connect_timeout, read_timeout);
        }

        match attempt {
            Ok(stream) => {
                tracing::debug!("connected to {}:{}", host, port);
                self.stream = Some(stream);
                self.last_error = None;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("failed to connect to {}:{}: {}", host, port, e);
                self.last_error = Some(e.to_string());
                Ok(false)
            }
        }
    }

    fn open(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> std::io::Result<Stream> {
        let mut last_error = None;
        for addr in (host, port).to_socket_addrs()? {
            let attempt = if connect_timeout.is_zero() {
                TcpStream::connect(addr)
            } else {
                TcpStream::connect_timeout(&addr, connect_timeout)
            };
            match attempt {
                Ok(stream) => {
                    // Disable Nagle's algorithm for low latency
                    stream.set_nodelay(true)?;
                    if !read_timeout.is_zero() {
                        stream.set_read_timeout(Some(read_timeout))?;
                    }

                    // Clone stream for separate read/write handles
                    let read_stream = stream.try_clone()?;
                    return Ok(Stream {
                        reader: BufReader::new(read_stream),
                        writer: BufWriter::new(stream),
                    });
                }
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "hostname resolved to no addresses",
            )
        }))
    }

    fn dispatch(&mut self, args: &[Arg]) -> Result<Reply> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| RebloomError::Transport("not connected".to_string()))?;

        if let Some(name) = args.first() {
            tracing::trace!("sending command {}", name);
        }

        let bytes = encode_command(args);
        let result = (|| {
            stream.writer.write_all(&bytes)?;
            stream.writer.flush()?;
            read_reply(&mut stream.reader)
        })();

        if let Err(ref e) = result {
            self.last_error = Some(e.to_string());
        }
        result
    }
}

impl Default for RespTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RespTransport {
    fn connect(
        &mut self,
        host: &str,
        port: u16,
        connect_timeout: Duration,
        retry_interval: Duration,
        read_timeout: Duration,
    ) -> Result<bool> {
        self.dial(host, port, connect_timeout, retry_interval, read_timeout)
    }

    fn connect_persistent(
        &mut self,
        host: &str,
        port: u16,
        connect_timeout: Duration,
        client_name: &str,
        retry_interval: Duration,
        read_timeout: Duration,
    ) -> Result<bool> {
        if !self.dial(host, port, connect_timeout, retry_interval, read_timeout)? {
            return Ok(false);
        }

        // CLIENT SETNAME rejects whitespace in names
        let name: String = client_name.split_whitespace().collect::<Vec<_>>().join("-");
        if !name.is_empty() {
            match self.dispatch(&[
                Arg::from("CLIENT"),
                Arg::from("SETNAME"),
                Arg::from(name),
            ]) {
                Ok(Reply::Error(e)) => tracing::debug!("CLIENT SETNAME rejected: {}", e),
                Ok(_) => {}
                Err(e) => tracing::debug!("CLIENT SETNAME failed: {}", e),
            }
        }
        Ok(true)
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn auth(&mut self, credentials: &Credentials) -> Result<bool> {
        let args = match credentials {
            Credentials::Password(password) => {
                vec![Arg::from("AUTH"), Arg::Str(password.clone())]
            }
            Credentials::UserPassword { username, password } => vec![
                Arg::from("AUTH"),
                Arg::Str(username.clone()),
                Arg::Str(password.clone()),
            ],
        };

        match self.dispatch(&args)? {
            Reply::Simple(ref s) if s.eq_ignore_ascii_case("ok") => Ok(true),
            Reply::Error(e) => {
                self.last_error = Some(e);
                Ok(false)
            }
            other => {
                self.last_error = Some(format!("unexpected AUTH reply: {:?}", other));
                Ok(false)
            }
        }
    }

    fn set_option(&mut self, option: TransportOption, _enabled: bool) -> Result<()> {
        match option {
            // This transport never coerces replies, so literal mode is
            // already in effect.
            TransportOption::ReplyLiteral => Ok(()),
        }
    }

    fn send_command(&mut self, args: &[Arg]) -> Result<Reply> {
        self.dispatch(args)
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

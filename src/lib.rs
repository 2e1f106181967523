//! # rebloom
//!
//! Client adapter for RedisBloom probabilistic data structures:
//! - Bloom filter operations (`BF.*`) — set membership with no false negatives
//! - Count-Min Sketch operations (`CMS.*`) — frequency counting that never
//!   underestimates
//! - Lazy, at-most-once connection establishment (plain or persistent, with
//!   optional authentication)
//! - Literal reply decoding, so mixed boolean/integer/array replies keep
//!   their types
//!
//! The probabilistic structures themselves live on the server; this crate is
//! the command-composition and reply-decoding layer.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────┐        ┌──────────────────┐
//! │   BloomFilter    │        │  CountMinSketch  │
//! │ (validate/build/ │        │ (validate/build/ │
//! │      decode)     │        │      decode)     │
//! └────────┬─────────┘        └────────┬─────────┘
//!          │                           │
//!          ▼                           ▼
//! ┌─────────────────────────────────────────────┐
//! │                 RedisClient                  │
//! │   (connect once, force literal replies,      │
//! │          dispatch command vector)            │
//! └────────────────────┬────────────────────────┘
//!                      │
//!                      ▼
//!              ┌───────────────┐
//!              │   Transport    │
//!              │ (RESP over TCP)│
//!              └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use rebloom::{BloomFilter, ConnectionParams, RedisClient, RespTransport};
//!
//! fn main() -> rebloom::Result<()> {
//!     let params = ConnectionParams::new("127.0.0.1", 6379);
//!     let client = Arc::new(RedisClient::new(RespTransport::new(), params));
//!
//!     let bloom = BloomFilter::new(client);
//!     bloom.reserve("fruits", 0.0001, 100)?;
//!     bloom.insert("fruits", "orange", None, None)?;
//!     assert!(bloom.exists("fruits", "orange")?);
//!     Ok(())
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod reply;
pub mod transport;
pub mod client;
pub mod types;
pub mod bloom;
pub mod cms;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use bloom::BloomFilter;
pub use client::RedisClient;
pub use cms::CountMinSketch;
pub use config::{ConnectionParams, ConnectionParamsBuilder};
pub use error::{RebloomError, Result};
pub use reply::Reply;
pub use transport::{Arg, Credentials, RespTransport, Transport, TransportOption};
pub use types::{CountMinSketchInfo, Pair};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the rebloom crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Bloom filter adapter
//!
//! Typed interface over the server's `BF.*` commands. Validates inputs
//! locally, builds the command vector, executes it through the shared client
//! and decodes the raw reply. The filter itself lives on the server; this
//! layer never touches its bits.

use std::sync::Arc;

use crate::client::RedisClient;
use crate::error::{RebloomError, Result};
use crate::transport::{Arg, Transport};
use crate::types::{validate_positive, validate_rate};

/// Set-membership operations over a server-side Bloom filter
///
/// Membership answers may contain false positives (tunable via the error
/// rate) but never false negatives.
pub struct BloomFilter<T: Transport> {
    client: Arc<RedisClient<T>>,
}

impl<T: Transport> BloomFilter<T> {
    pub fn new(client: Arc<RedisClient<T>>) -> Self {
        Self { client }
    }

    /// Create a filter sized for `capacity` items at the given error rate
    ///
    /// Fails with [`RebloomError::KeyAlreadyExists`] if the key is taken;
    /// re-reserving is not idempotent.
    pub fn reserve(&self, key: &str, error_rate: f64, capacity: u64) -> Result<bool> {
        validate_rate(error_rate)?;
        validate_positive("capacity", capacity)?;
        self.client
            .execute(&[
                Arg::from("BF.RESERVE"),
                Arg::from(key),
                Arg::from(error_rate),
                Arg::from(capacity),
            ])?
            .expect_ok()
    }

    /// Add one item, creating the filter on demand
    ///
    /// With `error_rate`/`capacity` given, a filter created on demand uses
    /// them for sizing; otherwise the server defaults apply. Returns whether
    /// the item was newly added (false means it was already possibly
    /// present).
    pub fn insert(
        &self,
        key: &str,
        item: &str,
        error_rate: Option<f64>,
        capacity: Option<u64>,
    ) -> Result<bool> {
        if error_rate.is_none() && capacity.is_none() {
            return self
                .client
                .execute(&[Arg::from("BF.ADD"), Arg::from(key), Arg::from(item)])?
                .expect_bool();
        }

        let results = self.insert_many(key, &[item], error_rate, capacity)?;
        single_result(results)
    }

    /// Add several items in one command, creating the filter on demand
    ///
    /// Returns one boolean per input item, in input order. An empty item
    /// list returns an empty result without a network call.
    pub fn insert_many(
        &self,
        key: &str,
        items: &[&str],
        error_rate: Option<f64>,
        capacity: Option<u64>,
    ) -> Result<Vec<bool>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(rate) = error_rate {
            validate_rate(rate)?;
        }
        if let Some(cap) = capacity {
            validate_positive("capacity", cap)?;
        }

        if error_rate.is_none() && capacity.is_none() {
            let mut args = vec![Arg::from("BF.MADD"), Arg::from(key)];
            args.extend(items.iter().map(|item| Arg::from(*item)));
            return self.client.execute(&args)?.expect_bool_array();
        }

        let args = insert_command(key, items, error_rate, capacity, false);
        self.client.execute(&args)?.expect_bool_array()
    }

    /// Add one item only if the filter already exists
    ///
    /// Fails with [`RebloomError::KeyNotFound`] instead of creating the key.
    /// The server enforces this in the same round trip; there is no separate
    /// existence probe to race against.
    pub fn insert_if_key_exists(&self, key: &str, item: &str) -> Result<bool> {
        let results = self.insert_many_if_key_exists(key, &[item])?;
        single_result(results)
    }

    /// Add several items only if the filter already exists
    pub fn insert_many_if_key_exists(&self, key: &str, items: &[&str]) -> Result<Vec<bool>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let args = insert_command(key, items, None, None, true);
        self.client.execute(&args)?.expect_bool_array()
    }

    /// Probe one item for membership
    pub fn exists(&self, key: &str, item: &str) -> Result<bool> {
        self.client
            .execute(&[Arg::from("BF.EXISTS"), Arg::from(key), Arg::from(item)])?
            .expect_bool()
    }

    /// Probe several items in one command
    ///
    /// Returns one boolean per input item, in input order. An empty item
    /// list returns an empty result without a network call.
    pub fn many_exist(&self, key: &str, items: &[&str]) -> Result<Vec<bool>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let mut args = vec![Arg::from("BF.MEXISTS"), Arg::from(key)];
        args.extend(items.iter().map(|item| Arg::from(*item)));
        self.client.execute(&args)?.expect_bool_array()
    }

    /// Duplicate a whole filter under a new key
    ///
    /// Streams the filter chunk by chunk through the server's dump/restore
    /// commands; the destination is a snapshot of the source at copy time.
    /// Fails with [`RebloomError::KeyNotFound`] if the source is absent.
    pub fn copy(&self, source: &str, dest: &str) -> Result<bool> {
        let mut iterator: i64 = 0;
        loop {
            let mut parts = self
                .client
                .execute(&[
                    Arg::from("BF.SCANDUMP"),
                    Arg::from(source),
                    Arg::from(iterator),
                ])?
                .expect_array()?
                .into_iter();

            iterator = parts
                .next()
                .ok_or_else(|| {
                    RebloomError::Protocol("dump reply missing iterator".to_string())
                })?
                .expect_int()?;
            if iterator == 0 {
                return Ok(true);
            }

            let chunk = parts
                .next()
                .ok_or_else(|| RebloomError::Protocol("dump reply missing chunk".to_string()))?
                .expect_bytes()?;

            self.client
                .execute(&[
                    Arg::from("BF.LOADCHUNK"),
                    Arg::from(dest),
                    Arg::from(iterator),
                    Arg::from(chunk),
                ])?
                .expect_ok()?;
        }
    }
}

/// Build a `BF.INSERT` command vector
///
/// Inputs are validated by the caller. `no_create` selects the add-only-if-
/// present variant.
fn insert_command(
    key: &str,
    items: &[&str],
    error_rate: Option<f64>,
    capacity: Option<u64>,
    no_create: bool,
) -> Vec<Arg> {
    let mut args = vec![Arg::from("BF.INSERT"), Arg::from(key)];
    if let Some(cap) = capacity {
        args.push(Arg::from("CAPACITY"));
        args.push(Arg::from(cap));
    }
    if let Some(rate) = error_rate {
        args.push(Arg::from("ERROR"));
        args.push(Arg::from(rate));
    }
    if no_create {
        args.push(Arg::from("NOCREATE"));
    }
    args.push(Arg::from("ITEMS"));
    args.extend(items.iter().map(|item| Arg::from(*item)));
    args
}

fn single_result(results: Vec<bool>) -> Result<bool> {
    results.into_iter().next().ok_or_else(|| {
        RebloomError::Protocol("insert reply contained no result".to_string())
    })
}

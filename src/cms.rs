//! Count-Min Sketch adapter
//!
//! Typed interface over the server's `CMS.*` commands. Per-label counts are
//! estimates that may overestimate but never underestimate.

use std::sync::Arc;

use crate::client::RedisClient;
use crate::error::{RebloomError, Result};
use crate::reply::Reply;
use crate::transport::{Arg, Transport};
use crate::types::{validate_positive, validate_rate, CountMinSketchInfo, Pair};

/// Frequency-counting operations over a server-side Count-Min Sketch
pub struct CountMinSketch<T: Transport> {
    client: Arc<RedisClient<T>>,
}

impl<T: Transport> CountMinSketch<T> {
    pub fn new(client: Arc<RedisClient<T>>) -> Self {
        Self { client }
    }

    /// Create a sketch with explicit dimensions
    ///
    /// `width` is the number of counters per row, `depth` the number of hash
    /// rows. Fails with [`RebloomError::KeyAlreadyExists`] if the key is
    /// taken.
    pub fn init_by_dimensions(&self, key: &str, width: u64, depth: u64) -> Result<bool> {
        validate_positive("width", width)?;
        validate_positive("depth", depth)?;
        self.client
            .execute(&[
                Arg::from("CMS.INITBYDIM"),
                Arg::from(key),
                Arg::from(width),
                Arg::from(depth),
            ])?
            .expect_ok()
    }

    /// Create a sketch sized from an error bound
    ///
    /// The server picks dimensions so that estimates overestimate by at most
    /// `error_rate` (relative to the total count) with confidence
    /// `probability`. Both must lie in (0, 1).
    pub fn init_by_probability(&self, key: &str, error_rate: f64, probability: f64) -> Result<bool> {
        validate_rate(error_rate)?;
        validate_rate(probability)?;
        self.client
            .execute(&[
                Arg::from("CMS.INITBYPROB"),
                Arg::from(key),
                Arg::from(error_rate),
                Arg::from(probability),
            ])?
            .expect_ok()
    }

    /// Apply one or more labeled increments as a single command
    ///
    /// Deltas are signed; the server floors counters at zero. Returns the
    /// post-increment count for each label, in input order. An empty input
    /// returns an empty result without a network call.
    pub fn increment_by(&self, key: &str, pairs: &[Pair]) -> Result<Vec<Pair>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec![Arg::from("CMS.INCRBY"), Arg::from(key)];
        for pair in pairs {
            args.push(Arg::Str(pair.label.clone()));
            args.push(Arg::from(pair.value));
        }

        let counts = self.client.execute(&args)?.expect_int_array()?;
        zip_counts(pairs.iter().map(|p| p.label.clone()), counts, pairs.len())
    }

    /// Query the current count estimate for each label
    ///
    /// Results are in the same order as the requested labels. An empty label
    /// list returns an empty result without a network call.
    pub fn query(&self, key: &str, labels: &[&str]) -> Result<Vec<Pair>> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec![Arg::from("CMS.QUERY"), Arg::from(key)];
        args.extend(labels.iter().map(|label| Arg::from(*label)));

        let counts = self.client.execute(&args)?.expect_int_array()?;
        zip_counts(
            labels.iter().map(|label| label.to_string()),
            counts,
            labels.len(),
        )
    }

    /// Merge source sketches into a destination, scaled by integer weights
    ///
    /// All sketches involved must share identical dimensions; the server
    /// rejects a mismatch, surfaced as [`RebloomError::Merge`].
    pub fn merge(&self, dest: &str, sources: &[(&str, i64)]) -> Result<bool> {
        validate_positive("source sketch count", sources.len() as u64)?;

        let mut args = vec![
            Arg::from("CMS.MERGE"),
            Arg::from(dest),
            Arg::from(sources.len() as u64),
        ];
        args.extend(sources.iter().map(|(key, _)| Arg::from(*key)));
        args.push(Arg::from("WEIGHTS"));
        args.extend(sources.iter().map(|(_, weight)| Arg::from(*weight)));

        match self.client.execute(&args)? {
            Reply::Error(message) => {
                let lower = message.to_ascii_lowercase();
                if lower.contains("not found") || lower.contains("does not exist") {
                    Err(RebloomError::KeyNotFound(message))
                } else {
                    Err(RebloomError::Merge(message))
                }
            }
            reply => reply.expect_ok(),
        }
    }

    /// Fetch a sketch's dimensions and cumulative count
    ///
    /// The server reports metadata as a flat alternating label/value
    /// sequence; fields are matched by label, not position.
    pub fn info(&self, key: &str) -> Result<CountMinSketchInfo> {
        let items = self
            .client
            .execute(&[Arg::from("CMS.INFO"), Arg::from(key)])?
            .expect_array()?;

        let mut width = None;
        let mut depth = None;
        let mut count = None;

        let mut fields = items.into_iter();
        while let (Some(label), Some(value)) = (fields.next(), fields.next()) {
            let label = label.expect_string()?;
            let value = value.expect_int()?;
            let value = u64::try_from(value).map_err(|_| {
                RebloomError::Protocol(format!("negative {} in info reply: {}", label, value))
            })?;
            match label.as_str() {
                "width" => width = Some(value),
                "depth" => depth = Some(value),
                "count" => count = Some(value),
                _ => {}
            }
        }

        match (width, depth, count) {
            (Some(width), Some(depth), Some(count)) => {
                Ok(CountMinSketchInfo::new(key, width, depth, count))
            }
            _ => Err(RebloomError::Protocol(
                "info reply missing width, depth or count".to_string(),
            )),
        }
    }
}

/// Pair returned counts back up with their labels, demanding an exact match
fn zip_counts(
    labels: impl Iterator<Item = String>,
    counts: Vec<i64>,
    expected: usize,
) -> Result<Vec<Pair>> {
    if counts.len() != expected {
        return Err(RebloomError::Protocol(format!(
            "expected {} counts in reply, got {}",
            expected,
            counts.len()
        )));
    }
    Ok(labels
        .zip(counts)
        .map(|(label, count)| Pair::new(label, count))
        .collect())
}

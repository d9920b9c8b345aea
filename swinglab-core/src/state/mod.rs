//! Ephemeral per-key state with TTL expiry.
//!
//! The store holds the three debounce records the evaluators feed on:
//! entry confirmations (keyed by symbol), EMA-breach counters and trend-gap
//! samples (keyed by position id). Records are small JSON blobs behind a
//! narrow get/set/delete seam so the engine stays unit-testable without a
//! live store.
//!
//! Losing a record — TTL expiry, eviction, a store outage — degrades to
//! "first observation", which is a safe, defined fallback. Nothing here is
//! a correctness dependency for the hard risk exits.

pub mod memory;
pub mod records;

pub use memory::MemoryStore;
pub use records::{EmaBreachState, EntryConfirmationState, TrendGapState};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Store-side failures. The engine degrades on these (treats the key as
/// absent, logs, keeps the decision) rather than aborting the tick.
#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("state store unavailable: {0}")]
    Unavailable(String),

    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value store with per-key expiry.
///
/// Implementations must guarantee atomic per-key get/set/delete — nothing
/// more. Multi-key transactions are deliberately not part of the contract;
/// every record is independently read-modify-written within one symbol's
/// strictly sequential evaluation.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StateStoreError>;
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StateStoreError>;
    fn delete(&self, key: &str) -> Result<(), StateStoreError>;
}

/// Entry confirmation key for a symbol.
pub fn entry_key(symbol: &str) -> String {
    format!("entry:{symbol}")
}

/// EMA-breach counter key for a position.
pub fn breach_key(position_id: u64) -> String {
    format!("ema_breach:{position_id}")
}

/// Trend-gap sample key for a position.
pub fn trend_key(position_id: u64) -> String {
    format!("trend:{position_id}")
}

/// Fetch and decode a typed record.
///
/// A record that fails to decode is treated the same as an absent record:
/// corrupt state must degrade to "first observation", never propagate as
/// fatal.
pub fn fetch<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
) -> Result<Option<T>, StateStoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!(key, %err, "malformed state record, treating as absent");
            Ok(None)
        }
    }
}

/// Encode and store a typed record with a TTL.
pub fn put<T: Serialize>(
    store: &dyn StateStore,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<(), StateStoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw, ttl)
}

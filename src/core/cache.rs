//! Single-slot rate cache with TTL staleness semantics.
//!
//! The cache owns one well-known storage key holding the last successfully
//! fetched rate table plus its fetch timestamp. Every operation is
//! synchronous and degrades to `None`/`false` when the storage backend is
//! unavailable or holds garbage; nothing in here panics or propagates
//! storage errors.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rates::RateTable;
use crate::store::KvStorage;

pub const RATES_CACHE_KEY: &str = "converter::rates";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// The persisted cache slot: a rate table, when it was fetched, and which
/// provider produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    pub payload: RateTable,
    /// Fetch completion time, epoch milliseconds.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Whether a cache timestamp is past its TTL at time `now`.
///
/// A non-finite timestamp is always expired.
pub fn is_expired(timestamp_ms: f64, ttl: Duration, now: i64) -> bool {
    if !timestamp_ms.is_finite() {
        return true;
    }
    (now as f64) - timestamp_ms > ttl.as_millis() as f64
}

#[derive(Clone)]
pub struct RatesCache {
    storage: Arc<dyn KvStorage>,
    ttl: Duration,
}

impl RatesCache {
    pub fn new(storage: Arc<dyn KvStorage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serialize the payload into the cache slot, timestamped now.
    /// Returns false when the storage backend rejects the write.
    pub fn write(&self, payload: &RateTable, source: Option<&str>) -> bool {
        let entry = CacheEntry {
            payload: payload.clone(),
            timestamp: now_ms(),
            source: source.map(str::to_string),
        };
        match serde_json::to_string(&entry) {
            Ok(json) => self.storage.set_item(RATES_CACHE_KEY, &json),
            Err(e) => {
                debug!("Failed to serialize cache entry: {e}");
                false
            }
        }
    }

    /// Read and validate the cache slot.
    ///
    /// Returns `None` when storage is unavailable, the slot is empty, the
    /// JSON is malformed, or the entry fails schema validation (same rate
    /// table rules as the wire payload, plus a finite timestamp).
    pub fn read(&self) -> Option<CacheEntry> {
        let raw = self.storage.get_item(RATES_CACHE_KEY)?;
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                debug!("Malformed cache entry: {e}");
                return None;
            }
        };

        let object = value.as_object()?;
        let payload = RateTable::from_payload(object.get("payload")?)?;
        let timestamp = object.get("timestamp")?.as_f64()?;
        if !timestamp.is_finite() {
            return None;
        }
        let source = object
            .get("source")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Some(CacheEntry {
            payload,
            timestamp: timestamp as i64,
            source,
        })
    }

    /// Whether an entry is past this cache's TTL.
    pub fn is_stale(&self, entry: &CacheEntry) -> bool {
        is_expired(entry.timestamp as f64, self.ttl, now_ms())
    }

    /// Drop the cache slot. Returns false when the removal fails.
    pub fn clear(&self) -> bool {
        self.storage.remove_item(RATES_CACHE_KEY)
    }
}

// LOC cache with a fixed freshness window.
// Serializes breakdowns with their fetch time and never serves stale entries.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::breakdown::LocBreakdown;
use crate::error::Result;
use crate::locator::CacheKey;

use super::store::KvStore;

/// Default freshness window: 30 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A breakdown plus the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    #[serde(flatten)]
    pub breakdown: LocBreakdown,
    #[serde(rename = "_date")]
    pub fetched_at_millis: i64,
}

impl CachedEntry {
    /// Milliseconds since the fetch. `None` for timestamps in the future or
    /// too far in the past to represent.
    pub fn age_millis(&self, now_millis: i64) -> Option<i64> {
        now_millis
            .checked_sub(self.fetched_at_millis)
            .filter(|age| *age >= 0)
    }

    /// Whether the entry is still within `ttl` of `now_millis`.
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.age_millis(now_millis)
            .is_some_and(|age| age <= ttl_millis)
    }
}

/// Breakdown cache keyed by repository/branch.
pub struct LocCache {
    store: Box<dyn KvStore>,
    clock: Box<dyn Clock>,
    ttl: Duration,
}

impl LocCache {
    pub fn new(store: Box<dyn KvStore>, ttl: Duration) -> Self {
        Self::with_clock(store, Box::new(SystemClock), ttl)
    }

    pub fn with_clock(store: Box<dyn KvStore>, clock: Box<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read whatever is stored for `key`, fresh or not.
    ///
    /// Storage failures and unparseable data are treated as absent.
    pub async fn read(&self, key: &CacheKey) -> Option<CachedEntry> {
        let raw = match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%key, error = %e, "LOC cache read failed");
                return None;
            }
        };

        match serde_json::from_str::<CachedEntry>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(%key, error = %e, "Ignoring malformed LOC cache entry");
                None
            }
        }
    }

    /// Get the cached entry for `key` if it is within the freshness window.
    pub async fn get(&self, key: &CacheKey) -> Option<CachedEntry> {
        let entry = self.read(key).await?;
        let now = self.clock.now_millis();
        if entry.is_fresh(now, self.ttl) {
            debug!(%key, age_ms = ?entry.age_millis(now), "LOC cache hit");
            Some(entry)
        } else {
            debug!(%key, age_ms = ?entry.age_millis(now), "LOC cache entry stale");
            None
        }
    }

    /// Store `breakdown` under `key`, stamped with the current time.
    pub async fn put(&self, key: &CacheKey, breakdown: &LocBreakdown) -> Result<()> {
        let entry = CachedEntry {
            breakdown: breakdown.clone(),
            fetched_at_millis: self.clock.now_millis(),
        };
        let json = serde_json::to_string(&entry)?;
        self.store.set(key.as_str(), &json).await?;
        debug!(%key, "LOC cache updated");
        Ok(())
    }
}

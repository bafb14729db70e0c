// Cache module for LOC breakdowns.
// A freshness-checked cache over a pluggable key-value store.

pub mod loc;
pub mod paths;
pub mod store;

pub use loc::{CachedEntry, Clock, DEFAULT_TTL, LocCache, SystemClock};
pub use store::{FileStore, KvStore, MemoryStore};

//! Lines-of-code statistics for repository pages.
//!
//! The library resolves which repository, branch and path a page shows,
//! serves LOC breakdowns from a freshness-checked cache or the remote LOC
//! service, and injects a trigger and panel into a page model. The binary
//! drives the same pieces from the command line and a terminal UI.

pub mod breakdown;
pub mod cache;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod locator;
pub mod page;

pub use breakdown::LocBreakdown;
pub use context::AppContext;
pub use error::{GhlocError, Result};
pub use locator::{CacheKey, PageHints, RepositoryLocator};

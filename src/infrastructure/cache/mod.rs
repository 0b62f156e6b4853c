//! Local memo cache in front of the remote store.
//!
//! - [`LocalCache`] - TTL cache with lazy expiry
//! - [`run_cache_sweeper`] - Optional background eviction of expired entries

mod local_cache;
mod sweeper;

pub use local_cache::LocalCache;
pub use sweeper::run_cache_sweeper;

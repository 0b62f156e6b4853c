//! Periodic eviction of expired local cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::LocalCache;

/// Purges expired entries from `cache` every `period`, forever.
pub async fn run_cache_sweeper(cache: Arc<LocalCache>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let purged = cache.purge_expired();
        if purged > 0 {
            debug!(purged, remaining = cache.len(), "Local cache sweep");
        }
    }
}

//! Background loading of the static redirect table.
//!
//! The table is built off the serving path on the blocking pool and published
//! with a single atomic swap. A failed load leaves the previous table (possibly
//! none) active; resolution keeps working against the cache and remote store.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::domain::static_table::{LoadError, StaticTableHandle, load_table_file};

/// Loads `path` once and publishes the result to `handle`.
///
/// Returns the number of entries in the published table.
///
/// # Errors
///
/// Returns the [`LoadError`] of the failed attempt; `handle` is left untouched.
pub async fn reload_table(
    path: &Path,
    known_prefixes: &BTreeSet<String>,
    handle: &StaticTableHandle,
) -> Result<usize, LoadError> {
    let started = Instant::now();
    info!("Loading static redirect table from {}", path.display());

    let owned_path = path.to_path_buf();
    let prefixes = known_prefixes.clone();
    let table = tokio::task::spawn_blocking(move || load_table_file(&owned_path, &prefixes))
        .await
        .map_err(|e| LoadError::Aborted(e.to_string()))??;

    let entries = table.len();
    handle.publish(table);

    info!(
        entries,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Static redirect table published"
    );
    Ok(entries)
}

/// Runs the table loader until the process exits.
///
/// Performs one load immediately. With a `reload_interval`, the file's
/// modification time is polled on every tick and the table is rebuilt when it
/// changes.
pub async fn run_table_loader(
    path: PathBuf,
    known_prefixes: BTreeSet<String>,
    handle: StaticTableHandle,
    reload_interval: Option<Duration>,
) {
    let mut loaded_mtime = modified_time(&path).await;
    if let Err(e) = reload_table(&path, &known_prefixes, &handle).await {
        error!("Failed to load static redirect table: {}", e);
    }

    let Some(period) = reload_interval else {
        return;
    };

    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let mtime = modified_time(&path).await;
        if mtime.is_none() || mtime == loaded_mtime {
            debug!("Static redirect table unchanged, skipping reload");
            continue;
        }
        loaded_mtime = mtime;

        if let Err(e) = reload_table(&path, &known_prefixes, &handle).await {
            error!(
                "Failed to reload static redirect table, keeping previous: {}",
                e
            );
        }
    }
}

async fn modified_time(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .ok()
}

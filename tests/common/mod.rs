#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url_mapper::application::services::ResolutionEngine;
use url_mapper::domain::entities::{HostMap, RedirectEntry};
use url_mapper::domain::repositories::{RemoteError, RemoteStore};
use url_mapper::domain::static_table::{StaticTableHandle, parse_table};
use url_mapper::infrastructure::cache::LocalCache;
use url_mapper::state::AppState;

pub const CACHE_TTL: Duration = Duration::from_secs(15);

/// In-memory remote store holding raw wire values, counting every fetch.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fetches: AtomicUsize,
    healthy: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            healthy: Mutex::new(true),
            ..Self::default()
        }
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.lock() = healthy;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch(&self, key: &str) -> Result<RedirectEntry, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let value = self
            .values
            .lock()
            .get(key)
            .cloned()
            .ok_or(RemoteError::NotFound)?;
        RedirectEntry::from_wire(&value).map_err(|source| RemoteError::Decode { value, source })
    }

    async fn health_check(&self) -> bool {
        *self.healthy.lock()
    }
}

pub fn known_prefixes() -> BTreeSet<String> {
    ["ua", "ru"].into_iter().map(String::from).collect()
}

pub fn test_hosts() -> HostMap {
    HostMap::parse("ua.example.com=ua,example.com=ua,www.example.ru=ru", "").unwrap()
}

pub fn published_table(source: &str) -> StaticTableHandle {
    let handle = StaticTableHandle::new();
    handle.publish(parse_table(source, &known_prefixes()).unwrap());
    handle
}

pub fn create_engine(table: StaticTableHandle, store: Arc<MemoryStore>) -> ResolutionEngine {
    ResolutionEngine::new(table, Arc::new(LocalCache::new()), store, CACHE_TTL)
}

pub fn create_test_state(
    table: StaticTableHandle,
    store: Arc<MemoryStore>,
    map_file_configured: bool,
) -> AppState {
    AppState::new(
        Arc::new(create_engine(table, store)),
        Arc::new(test_hosts()),
        map_file_configured,
    )
}

//! Remote store used when Redis is not configured.

use crate::domain::entities::RedirectEntry;
use crate::domain::repositories::{RemoteError, RemoteStore};
use async_trait::async_trait;
use tracing::debug;

/// A remote store that holds nothing.
///
/// Every lookup is [`RemoteError::NotFound`], so resolution is served from the
/// static table alone.
pub struct NullStore;

impl NullStore {
    pub fn new() -> Self {
        debug!("Using NullStore (remote lookups disabled)");
        Self
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for NullStore {
    async fn fetch(&self, _key: &str) -> Result<RedirectEntry, RemoteError> {
        Err(RemoteError::NotFound)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

//! Redis-backed remote store.

use super::pool::{PoolConfig, PoolStatus, RedisPool};
use crate::domain::entities::{CodecError, RedirectEntry};
use crate::domain::repositories::{RemoteError, RemoteStore};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Remote store reading `<code> <target>` values from Redis with one `GET`
/// per lookup.
///
/// The connection is returned to the pool as soon as the raw value is read,
/// before decoding.
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    /// Creates a store for `redis_url`. Connections are opened lazily.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] if the URL is invalid.
    pub fn new(redis_url: &str, config: PoolConfig) -> Result<Self, RemoteError> {
        info!(
            max_active = config.max_active,
            max_idle = config.max_idle,
            io_timeout_ms = config.io_timeout.as_millis() as u64,
            "Creating Redis connection pool"
        );
        Ok(Self {
            pool: RedisPool::new(redis_url, config)?,
        })
    }

    pub fn pool_status(&self) -> PoolStatus {
        self.pool.status()
    }

    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, RemoteError> {
        let mut conn = self.pool.get().await?;
        conn.get_value(key).await
    }
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn fetch(&self, key: &str) -> Result<RedirectEntry, RemoteError> {
        let bytes = match self.get_raw(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Redis MISS: {}", key);
                return Err(RemoteError::NotFound);
            }
            Err(e) => {
                warn!("Redis error for {}: {}", key, e);
                return Err(e);
            }
        };

        let value = String::from_utf8(bytes).map_err(|e| {
            let value = String::from_utf8_lossy(e.as_bytes()).into_owned();
            warn!("Redis format error for {}: '{}' is not UTF-8", key, value);
            RemoteError::Decode {
                value,
                source: CodecError::InvalidUtf8,
            }
        })?;

        RedirectEntry::from_wire(&value).map_err(|source| {
            warn!("Redis format error for {}: '{}'", key, value);
            RemoteError::Decode { value, source }
        })
    }

    async fn health_check(&self) -> bool {
        match self.pool.get().await {
            Ok(mut conn) => conn.ping().await.is_ok(),
            Err(_) => false,
        }
    }
}

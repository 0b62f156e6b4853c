//! Remote key-value store holding redirect entries.

use crate::domain::entities::{CodecError, RedirectEntry};
use async_trait::async_trait;

/// Errors returned by a [`RemoteStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The store has no value for the key.
    #[error("no value stored for key")]
    NotFound,

    /// Dial, I/O, timeout or protocol failure.
    #[error("remote store transport error: {0}")]
    Transport(String),

    /// Every connection slot is in use; the request fails fast.
    #[error("remote store connection pool exhausted")]
    PoolExhausted,

    /// The stored value could not be decoded into an entry.
    #[error("malformed stored value '{value}': {source}")]
    Decode {
        value: String,
        #[source]
        source: CodecError,
    },
}

impl RemoteError {
    /// True for failures of the store itself rather than of the lookup.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::PoolExhausted)
    }
}

/// Single-key lookup against the remote store.
///
/// Implementations must be thread-safe and must release any connection before
/// returning, on every exit path.
///
/// # Implementations
///
/// - [`crate::infrastructure::remote::RedisStore`] - Pooled Redis client
/// - [`crate::infrastructure::remote::NullStore`] - Empty store used when Redis is not configured
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetches and decodes the entry stored under `key`.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::NotFound`] if the key has no value
    /// - [`RemoteError::Transport`] / [`RemoteError::PoolExhausted`] on connection failures
    /// - [`RemoteError::Decode`] if the value is not `<code> <target>`
    async fn fetch(&self, key: &str) -> Result<RedirectEntry, RemoteError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}

//! Remote store clients.
//!
//! Implementations of [`crate::domain::repositories::RemoteStore`]:
//! - [`RedisStore`] - Production Redis client over a bounded [`RedisPool`]
//! - [`NullStore`] - Empty store for static-only deployments

#[cfg(test)]
mod fake_redis;
mod null_store;
mod pool;
mod redis_store;

pub use null_store::NullStore;
pub use pool::{PoolConfig, PoolStatus, RedisPool};
pub use redis_store::RedisStore;

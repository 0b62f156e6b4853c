//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for caching and remote lookups.
//!
//! # Modules
//!
//! - [`cache`] - In-process TTL cache
//! - [`remote`] - Redis and no-op remote store implementations

pub mod cache;
pub mod remote;

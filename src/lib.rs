//! # URL Mapper
//!
//! A redirect resolver that maps an incoming `(host, path)` pair to either an
//! internal content rewrite (served by the front-end proxy via
//! `X-Accel-Redirect`) or an external `301` redirect.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Redirect entries, static table, remote store trait
//! - **Application Layer** ([`application`]) - Tiered resolution engine
//! - **Infrastructure Layer** ([`infrastructure`]) - Local cache and Redis client
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Resolution Tiers
//!
//! 1. **Static table** - Hot-loaded from a map file, swapped atomically
//! 2. **Local cache** - Short-lived memo of remote hits
//! 3. **Remote store** - Redis, queried on cache miss through a bounded pool
//!
//! ## Quick Start
//!
//! ```bash
//! export HOST_PREFIXES="ua.example.com=ua,www.example.ru=ru"
//! export REDIS_URL="redis://localhost:6379"  # Optional
//! export URL_MAP_FILE="./url-map.txt"        # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{Resolution, ResolutionEngine, ResolveError, Tier};
    pub use crate::domain::entities::{HostMap, RedirectEntry, RedirectKind};
    pub use crate::domain::repositories::{RemoteError, RemoteStore};
    pub use crate::domain::static_table::{StaticTable, StaticTableHandle};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::LocalCache;
    pub use crate::state::AppState;
}

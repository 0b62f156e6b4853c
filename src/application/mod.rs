//! Application layer services implementing redirect resolution.
//!
//! This layer orchestrates the static table, the local cache and the remote
//! store into a single lookup used by HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::resolution_service::ResolutionEngine`] - Tiered redirect resolution

pub mod services;

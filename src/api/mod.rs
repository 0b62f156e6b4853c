//! HTTP layer translating requests into redirect resolutions.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request processing middleware

pub mod dto;
pub mod handlers;
pub mod middleware;

//! Data Transfer Objects for API responses.
//!
//! All DTOs use Serde for JSON serialization.

pub mod health;

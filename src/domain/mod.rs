//! Domain layer containing redirect entities and the static table.
//!
//! # Architecture
//!
//! - [`entities`] - Redirect entries, their codec, and the host map
//! - [`repositories`] - Remote store trait definition
//! - [`static_table`] - Immutable redirect table, swappable handle, and file loader
//! - [`table_worker`] - Background task that loads and reloads the table
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - The remote store trait is implemented by the infrastructure layer
//! - Resolution order is orchestrated in [`crate::application::services`]

pub mod entities;
pub mod repositories;
pub mod static_table;
pub mod table_worker;

//! Repository trait definitions for the domain layer.
//!
//! The remote key-value store is the only external data source the domain
//! consults; its concrete clients live in `crate::infrastructure::remote`.
//! Mock implementations are auto-generated via `mockall` for testing.

pub mod remote_store;

pub use remote_store::{RemoteError, RemoteStore};

#[cfg(test)]
pub use remote_store::MockRemoteStore;

//! Domain entities for redirect resolution.
//!
//! - [`RedirectEntry`] - Immutable redirect instruction and its text codec
//! - [`HostMap`] - Request host to site prefix mapping

pub mod host_map;
pub mod redirect;

pub use host_map::{HostMap, HostMapError};
pub use redirect::{CodecError, RedirectEntry, RedirectKind, resolution_key};

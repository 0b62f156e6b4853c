//! Utility functions for request handling.
//!
//! - [`extract_host`] - Host extraction from HTTP headers
//! - [`request_path`] - Percent-decoding of the request path

pub mod extract_host;
pub mod request_path;

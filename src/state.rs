//! Shared application state for HTTP handlers.

use std::sync::Arc;

use crate::application::services::ResolutionEngine;
use crate::domain::entities::HostMap;

/// Handles constructed once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ResolutionEngine>,
    pub hosts: Arc<HostMap>,
    /// Whether a map file is configured; an unloaded table is then reported
    /// as degraded by the health check.
    pub map_file_configured: bool,
}

impl AppState {
    pub fn new(
        engine: Arc<ResolutionEngine>,
        hosts: Arc<HostMap>,
        map_file_configured: bool,
    ) -> Self {
        Self {
            engine,
            hosts,
            map_file_configured,
        }
    }
}

//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /_health` - Health check: static table, local cache, remote store
//! - `GET *`        - Redirect resolution for every other path; other
//!   methods get `405 Method Not Allowed`
//!
//! Paths are percent-decoded and otherwise matched exactly; no trailing-slash
//! normalization is applied, since map entries are keyed by the exact path.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging

use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Path of the health check endpoint. Shadows a redirect with the same path.
pub const HEALTH_PATH: &str = "/_health";

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .fallback(get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

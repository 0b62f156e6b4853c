//! Handler for redirect resolution.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::application::services::ResolveError;
use crate::domain::entities::RedirectKind;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_host::extract_host_from_headers;
use crate::utils::request_path::decode_request_path;

/// Header instructing the front-end proxy to serve another location internally.
pub const ACCEL_REDIRECT_HEADER: &str = "X-Accel-Redirect";

/// Resolves the request path and answers with a rewrite or a redirect.
///
/// # Endpoint
///
/// Catch-all: every path not claimed by another route.
///
/// # Request Flow
///
/// 1. Map the `Host` header to a site prefix (unknown host → 404)
/// 2. Percent-decode the path (invalid UTF-8 → 404)
/// 3. Resolve `(prefix, path)` through static table, local cache, remote store
/// 4. Append the raw query string to the target, if any
/// 5. Internal entries → `200 OK` with `X-Accel-Redirect: <target>`
/// 6. External entries → `301 Moved Permanently` with `Location: <target>`
///
/// # Errors
///
/// Returns 400 Bad Request if the Host header is missing or invalid.
/// Returns 404 Not Found if the host is unknown, no tier has an entry, or the
/// remote store fails.
pub async fn redirect_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, AppError> {
    let started = Instant::now();

    let host = extract_host_from_headers(&headers)?;
    let Some(prefix) = state.hosts.prefix_for(host) else {
        warn!(path = uri.path(), "Not found host: {}", host);
        return Err(AppError::not_found("Unknown host", json!({ "host": host })));
    };

    let decoded = decode_request_path(uri.path())?;
    let path: &str = &decoded;

    let resolution = match state.engine.resolve(prefix, path).await {
        Ok(resolution) => resolution,
        Err(e) => {
            match &e {
                ResolveError::NotFound { .. } => info!(path, prefix, "Not match any"),
                ResolveError::Remote { source, .. } => {
                    warn!(path, prefix, "Remote lookup failed: {}", source)
                }
            }
            return Err(e.into());
        }
    };

    let target = resolution.entry.target_with_query(uri.query());
    info!(
        path,
        tier = %resolution.tier,
        code = %resolution.entry.kind,
        target = %target,
        remote_us = resolution.remote_elapsed.as_micros() as u64,
        total_us = started.elapsed().as_micros() as u64,
        "Redirect resolved"
    );

    let response = match resolution.entry.kind {
        RedirectKind::Internal => {
            (StatusCode::OK, [(ACCEL_REDIRECT_HEADER, target)]).into_response()
        }
        RedirectKind::External => {
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response()
        }
    };

    Ok(response)
}

//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with per-tier checks.
///
/// # Endpoint
///
/// `GET /_health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: Remote store unreachable, or a configured
///   map file has not been loaded (resolution runs remote-only)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "static_table": { "status": "ok", "message": "Loaded, 120345 entries" },
///     "local_cache": { "status": "ok", "message": "42 entries" },
///     "remote_store": { "status": "ok", "message": "Reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let static_check = check_static_table(&state);
    let cache_check = CheckStatus::ok(format!("{} entries", state.engine.cache().len()));
    let remote_check = check_remote_store(&state).await;

    let all_healthy = static_check.is_ok() && cache_check.is_ok() && remote_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            static_table: static_check,
            local_cache: cache_check,
            remote_store: remote_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn check_static_table(state: &AppState) -> CheckStatus {
    match state.engine.table().current() {
        Some(table) => CheckStatus::ok(format!("Loaded, {} entries", table.len())),
        None if state.map_file_configured => CheckStatus::error("Map file not loaded"),
        None => CheckStatus::ok("No map file configured"),
    }
}

async fn check_remote_store(state: &AppState) -> CheckStatus {
    if state.engine.store().health_check().await {
        CheckStatus::ok("Reachable")
    } else {
        CheckStatus::error("Remote store connection failed")
    }
}

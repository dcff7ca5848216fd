//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// Liveness response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `true`.
    pub ok: bool,
    /// Registrant table in use.
    pub table: String,
    /// Ticket index in use.
    pub index: String,
    /// Service version.
    pub version: String,
}

/// Readiness response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// Always `true`; failures are reported as 503 errors.
    pub ok: bool,
}

/// Simple health check endpoint (for basic liveness).
///
/// Does NOT check the store.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "ok": true, "table": "event_users", "index": "ticket_id_index", "version": "0.1.0" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        table: state.table_name().to_string(),
        index: state.index_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check: pings the store.
///
/// # Status Codes
///
/// - 200 OK: store reachable
/// - 503 Service Unavailable: store unreachable
///
/// # Endpoint
///
/// ```text
/// GET /ready
/// ```
///
/// # Errors
///
/// Returns a 503 [`AppError`] carrying the store's diagnostic.
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>, AppError> {
    state.store().ping().await.map_err(|err| {
        tracing::warn!(error = %err, "Readiness probe failed");
        AppError::unavailable(err.to_string())
    })?;
    Ok(Json(ReadyResponse { ok: true }))
}

//! Route table and middleware stack.

use crate::handlers;
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the HTTP router.
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | `/health` | liveness |
/// | GET | `/ready` | store ping |
/// | POST | `/badge` | badge preview |
/// | POST | `/checkin` | check-in and badge |
/// | POST | `/pdf` | sample badge |
///
/// Layers, outermost first: correlation id, request tracing, permissive CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/badge", post(handlers::badge))
        .route("/checkin", post(handlers::checkin))
        .route("/pdf", post(handlers::sample_pdf))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}

//! Prometheus exporter.
//!
//! Installs the global `metrics` recorder and serves `/metrics` on its own
//! listener. Desk metric descriptions come from
//! [`badge_desk_core::metrics::register_metrics`].

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use std::net::SocketAddr;

/// Latency buckets for every `*_duration_seconds` histogram.
const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Metrics exporter errors.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure or install the exporter.
    #[error("failed to install Prometheus exporter: {0}")]
    Install(#[from] BuildError),
}

/// Install the Prometheus recorder and start its HTTP listener on `addr`.
///
/// Must be called from inside a Tokio runtime, once per process.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a recorder is already installed or the
/// listener cannot be configured.
pub fn install(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            DURATION_BUCKETS,
        )?
        .install()?;

    badge_desk_core::metrics::register_metrics();
    tracing::info!(%addr, "Metrics server started - available at http://{addr}/metrics");
    Ok(())
}

//! Badge Desk server wiring.
//!
//! Configuration, Prometheus exporter and the serve/shutdown loop used by the
//! `badge-desk` binary. The check-in behavior itself lives in
//! `badge-desk-core`, the HTTP routes in `badge-desk-web`.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod config;
pub mod lifecycle;
pub mod metrics;

pub use config::{Config, ConfigError};

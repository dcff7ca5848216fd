//! HTTP surface for Badge Desk.
//!
//! A thin Axum shell over [`CheckinDesk`](badge_desk_core::CheckinDesk): handlers
//! parse JSON, call the desk and map its outcome or error to a response.
//!
//! # Request Flow
//!
//! 1. **Correlation id** is read or generated and attached to the request span
//! 2. **Extract** the JSON body (malformed bodies are 400s)
//! 3. **Call** the desk (`preview`, `check_in` or `sample_badge`)
//! 4. **Map** the outcome to camelCase JSON with a base64 PDF, or the error
//!    to a status code and `{code, message}` body
//!
//! # Example
//!
//! ```ignore
//! use badge_desk_web::{AppState, build_router};
//!
//! let state = AppState::new(desk, store, "event_users", "ticket_id_index");
//! let app = build_router(state);
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, CorrelationIdExt, correlation_id_layer};
pub use router::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

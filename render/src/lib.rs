//! Attendee badge renderer for Badge Desk.
//!
//! Renders a fixed 4x2 inch label (288x144 points) carrying the event title,
//! the attendee's name and profession, the ticket id and the check-in time.
//! Rendering is a pure function of its four inputs: no I/O, no clock, and
//! byte-identical output for identical input.
//!
//! Rendering happens in two steps:
//!
//! 1. [`layout_badge`] positions every element and picks font sizes. Name and
//!    profession shrink one point at a time until they fit the usable width
//!    or reach their floor size.
//! 2. [`pdf::encode`] writes the layout as a PDF with the standard Helvetica faces.
//!
//! # Example
//!
//! ```
//! use badge_desk_render::{BadgeFields, render_badge};
//!
//! let pdf = render_badge(&BadgeFields {
//!     ticket_id: "T-001",
//!     name: "Ada Lovelace",
//!     profession: "Engineer",
//!     checked_in_at: "2024-01-01T10:00:00Z",
//! })
//! .unwrap();
//! assert!(pdf.starts_with(b"%PDF-"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod font;
pub mod layout;
pub mod pdf;

use thiserror::Error;

pub use font::Font;
pub use layout::{
    BadgeFields, BadgeLayout, DEFAULT_NAME, DEFAULT_PROFESSION, Element, FitRange, TextRun,
    fit_font_size, layout_badge, or_placeholder,
};

/// MIME type of rendered badges.
pub const CONTENT_TYPE: &str = "application/pdf";

/// Errors from badge rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadgeError {
    /// The PDF writer rejected the document.
    #[error("Failed to encode badge PDF: {0}")]
    Encode(String),
}

/// Render a badge to PDF bytes.
///
/// Blank `name` / `profession` render as [`DEFAULT_NAME`] / [`DEFAULT_PROFESSION`].
/// `ticket_id` and `checked_in_at` are printed as given.
///
/// # Errors
///
/// Returns [`BadgeError::Encode`] if the PDF writer fails.
pub fn render_badge(fields: &BadgeFields<'_>) -> Result<Vec<u8>, BadgeError> {
    pdf::encode(&layout_badge(fields))
}

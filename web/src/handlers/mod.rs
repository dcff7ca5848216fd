//! HTTP request handlers.

pub mod badge;
pub mod health;

pub use badge::{badge, checkin, sample_pdf};
pub use health::{health, ready};

//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin wrappers that delegate to `JobTracker`.

pub mod downloads;
pub mod files;

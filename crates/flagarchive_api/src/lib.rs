//! Dispatch layer for the flag archive.
//!
//! Callers hand in already-decoded requests; this crate opens storage, runs
//! the core service and maps the outcome to a status code plus JSON body.

pub mod api;

pub use api::{status_for, ApiContext, ApiResponse};

//! Driver observability
//!
//! Structured logging for the query pipeline.

pub mod logger;

pub use logger::{log, log_request, Severity};

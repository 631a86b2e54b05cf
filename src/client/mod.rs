//! Client query pipeline
//!
//! Issues one HTTP POST per expression, manages one in-flight
//! cancellable operation per submission, and decodes replies into
//! values.

pub mod client;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod response;

pub use client::Client;
pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult};
pub use pipeline::{QueryHandle, RequestState};
pub use response::QueryError;

//! lagoon-driver - Async Rust driver for the Lagoon document database
//!
//! Application code builds an [`Expr`] query tree, submits it through a
//! [`Client`], and decodes the server's reply as a [`Value`].

pub mod client;
pub mod observability;
pub mod query;
pub mod sync;
pub mod values;

pub use client::{Client, ClientConfig, ClientError, QueryError, QueryHandle, RequestState};
pub use query::{Cursor, Expr, Page, Paginate};
pub use sync::{Latch, Sequence, WaitTimeout};
pub use values::{DecodeError, Ref, SetRef, Step, Value};

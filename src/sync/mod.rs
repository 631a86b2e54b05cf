//! Cross-cutting synchronization utilities
//!
//! Consumed by the client pipeline and by any code needing a
//! synchronous view of an asynchronous result.

pub mod counter;
pub mod latch;

pub use counter::Sequence;
pub use latch::{Latch, WaitTimeout};

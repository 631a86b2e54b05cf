//! Query expression builder
//!
//! Composable expression nodes mirroring the value algebra plus server
//! function calls and lambdas, serializing to the request wire format.

pub mod cursor;
pub mod expr;
pub mod functions;

pub use cursor::{Cursor, Page};
pub use expr::{Expr, FnCall};
pub use functions::Paginate;

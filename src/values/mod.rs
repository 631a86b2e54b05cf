//! Value algebra and wire codec
//!
//! The closed set of data variants a query can read or write, plus
//! lossless encode/decode to and from the wire's tagged-JSON shapes.

pub mod codec;
pub mod errors;
pub mod temporal;
pub mod value;

pub use codec::{decode, encode, from_wire_string, to_wire_string};
pub use errors::{DecodeError, DecodeResult};
pub use value::{FromValue, Ref, SetRef, Step, Value};

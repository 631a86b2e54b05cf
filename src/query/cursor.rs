//! Pagination cursors
//!
//! Page-boundary tokens are opaque: the driver never interprets them,
//! it only echoes them back on the next paginate call.

use crate::values::{DecodeError, DecodeResult, Value};

/// An opaque page-boundary token, positioned before or after a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Cursor {
    Before(Value),
    After(Value),
}

impl Cursor {
    /// The wire key this cursor serializes under.
    pub fn wire_key(&self) -> &'static str {
        match self {
            Cursor::Before(_) => "before",
            Cursor::After(_) => "after",
        }
    }

    /// Borrows the wrapped token.
    pub fn token(&self) -> &Value {
        match self {
            Cursor::Before(token) | Cursor::After(token) => token,
        }
    }

    /// Consumes the cursor, yielding the wrapped token.
    pub fn into_token(self) -> Value {
        match self {
            Cursor::Before(token) | Cursor::After(token) => token,
        }
    }
}

/// One decoded page of a paginate result: the data plus the boundary
/// cursors needed to continue paging in either direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The page's elements, in server order
    pub data: Vec<Value>,
    /// Token for the page preceding this one, if any
    pub before: Option<Cursor>,
    /// Token for the page following this one, if any
    pub after: Option<Cursor>,
}

impl Page {
    /// Builds a page from a decoded paginate response value.
    ///
    /// The value must be an object carrying a `data` array; `before`
    /// and `after` tokens are taken verbatim when present.
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(DecodeError::unexpected("Object", other.variant_name())),
        };
        let data = match map.get("data") {
            Some(Value::Array(items)) => items.clone(),
            Some(other) => return Err(DecodeError::unexpected("Array", other.variant_name())),
            None => return Err(DecodeError::malformed("page is missing its data field")),
        };
        Ok(Self {
            data,
            before: map.get("before").cloned().map(Cursor::Before),
            after: map.get("after").cloned().map(Cursor::After),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wire_keys() {
        assert_eq!(Cursor::Before(Value::Null).wire_key(), "before");
        assert_eq!(Cursor::After(Value::Null).wire_key(), "after");
    }

    #[test]
    fn test_page_from_value() {
        let value = Value::object([
            ("data", Value::Array(vec![Value::Int(1), Value::Int(2)])),
            ("after", Value::Array(vec![Value::from("token123")])),
        ]);
        let page = Page::from_value(&value).unwrap();
        assert_eq!(page.data.len(), 2);
        assert!(page.before.is_none());
        assert_eq!(
            page.after,
            Some(Cursor::After(Value::Array(vec![Value::from("token123")])))
        );
    }

    #[test]
    fn test_page_requires_data_array() {
        let missing = Value::object([("after", Value::Null)]);
        assert!(Page::from_value(&missing).is_err());

        let wrong_variant = Value::object([("data", Value::Int(1))]);
        assert!(Page::from_value(&wrong_variant).is_err());
    }
}

//! Value algebra
//!
//! The closed, recursive set of data variants a query can read or
//! write. Every decoder in the driver is built on [`Value::at`] and the
//! typed [`Value::get`] extraction.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::errors::{DecodeError, DecodeResult};

/// A value readable from or writable to the database.
///
/// Structural equality:
/// - arrays are order-sensitive
/// - objects are order-insensitive
/// - numeric variants never coerce (`Int(1) != Double(1.0)`)
/// - refs compare by path, not identity
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer number (no implicit coercion to Double)
    Int(i64),
    /// Floating-point number
    Double(f64),
    /// UTF-8 text
    String(String),
    /// Ordered sequence
    Array(Vec<Value>),
    /// String-keyed mapping, keys unique
    Object(BTreeMap<String, Value>),
    /// Resource path (id + parent collection chain)
    Ref(Ref),
    /// Opaque, named match description
    SetRef(SetRef),
    /// UTC instant, millisecond precision on the wire
    Timestamp(DateTime<Utc>),
    /// Calendar date without a time component
    Date(NaiveDate),
    /// Raw binary payload
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns the variant name, used in decode error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Double(_) => "Double",
            Value::String(_) => "String",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Ref(_) => "Ref",
            Value::SetRef(_) => "SetRef",
            Value::Timestamp(_) => "Timestamp",
            Value::Date(_) => "Date",
            Value::Bytes(_) => "Bytes",
        }
    }

    /// Builds an object value from key/value pairs.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// Walks the tree through nested objects (key steps) and arrays
    /// (index steps).
    ///
    /// Returns `None` if any step fails to resolve; never errors.
    pub fn at(&self, path: &[Step]) -> Option<&Value> {
        let mut current = self;
        for step in path {
            current = match (current, step) {
                (Value::Object(map), Step::Key(key)) => map.get(key)?,
                (Value::Array(items), Step::Index(index)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Typed extraction at a path.
    ///
    /// Returns `Ok(None)` when the path does not resolve, and
    /// `Err(DecodeError)` only when the leaf exists but its variant is
    /// incompatible with the requested type.
    pub fn get<T: FromValue>(&self, path: &[Step]) -> DecodeResult<Option<T>> {
        match self.at(path) {
            Some(leaf) => T::from_value(leaf).map(Some),
            None => Ok(None),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Ref> for Value {
    fn from(v: Ref) -> Self {
        Value::Ref(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

/// A structured resource path identifying a database object.
///
/// Equality is path equality: two refs are equal when their id and
/// entire parent chain match.
#[derive(Debug, Clone, PartialEq)]
pub struct Ref {
    /// Identifier within the parent collection (or a root name)
    pub id: String,
    /// Parent collection ref, if any
    pub collection: Option<Box<Ref>>,
    /// Parent database ref, if any
    pub database: Option<Box<Ref>>,
}

impl Ref {
    /// Creates a root-level ref (e.g. a collection ref).
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection: None,
            database: None,
        }
    }

    /// Creates a document ref nested under a collection ref.
    pub fn document(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection: Some(Box::new(Ref::new(collection))),
            database: None,
        }
    }

    /// Returns a copy nested under the given parent collection.
    pub fn within(mut self, collection: Ref) -> Self {
        self.collection = Some(Box::new(collection));
        self
    }

    /// Returns a copy scoped to the given database.
    pub fn in_database(mut self, database: Ref) -> Self {
        self.database = Some(Box::new(database));
        self
    }
}

/// An opaque, named description of a match result set.
///
/// Not enumerable without issuing a query; the driver carries it
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct SetRef {
    /// The match description exactly as the server supplied it
    pub parameters: BTreeMap<String, Value>,
}

impl SetRef {
    pub fn new(parameters: BTreeMap<String, Value>) -> Self {
        Self { parameters }
    }
}

/// One step of an extraction path.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Object key lookup
    Key(String),
    /// Array index lookup
    Index(usize),
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(key.to_string())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Step::Key(key)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

/// Conversion from a value tree leaf into a concrete Rust type.
///
/// Implementations fail with [`DecodeError::UnexpectedVariant`] when
/// the leaf's variant does not match; they never coerce.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> DecodeResult<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(DecodeError::unexpected("String", other.variant_name())),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(DecodeError::unexpected("Bool", other.variant_name())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            other => Err(DecodeError::unexpected("Int", other.variant_name())),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::Double(d) => Ok(*d),
            other => Err(DecodeError::unexpected("Double", other.variant_name())),
        }
    }
}

impl FromValue for Ref {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::Ref(r) => Ok(r.clone()),
            other => Err(DecodeError::unexpected("Ref", other.variant_name())),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            other => Err(DecodeError::unexpected("Timestamp", other.variant_name())),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::Date(d) => Ok(*d),
            other => Err(DecodeError::unexpected("Date", other.variant_name())),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            other => Err(DecodeError::unexpected("Bytes", other.variant_name())),
        }
    }
}

impl FromValue for Vec<Value> {
    fn from_value(value: &Value) -> DecodeResult<Self> {
        match value {
            Value::Array(items) => Ok(items.clone()),
            other => Err(DecodeError::unexpected("Array", other.variant_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Value {
        Value::object([
            (
                "data",
                Value::object([
                    ("title", Value::from("Hello")),
                    ("tags", Value::Array(vec!["a".into(), "b".into()])),
                ]),
            ),
            ("count", Value::Int(3)),
        ])
    }

    #[test]
    fn test_numeric_variants_do_not_coerce() {
        assert_ne!(Value::Int(1), Value::Double(1.0));
        assert_eq!(Value::Int(1), Value::Int(1));
    }

    #[test]
    fn test_array_equality_is_order_sensitive() {
        let a = Value::Array(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::Array(vec![Value::Int(2), Value::Int(1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_object_equality_ignores_insertion_order() {
        let a = Value::object([("x", Value::Int(1)), ("y", Value::Int(2))]);
        let b = Value::object([("y", Value::Int(2)), ("x", Value::Int(1))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ref_equality_is_path_equality() {
        let a = Ref::document("posts", "42");
        let b = Ref::document("posts", "42");
        let c = Ref::document("users", "42");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_at_walks_objects_and_arrays() {
        let tree = sample_tree();
        let title = tree.at(&["data".into(), "title".into()]).unwrap();
        assert_eq!(title, &Value::from("Hello"));

        let second_tag = tree.at(&["data".into(), "tags".into(), 1.into()]).unwrap();
        assert_eq!(second_tag, &Value::from("b"));
    }

    #[test]
    fn test_at_missing_path_is_none() {
        let tree = sample_tree();
        assert!(tree.at(&["data".into(), "missing".into()]).is_none());
        assert!(tree.at(&["data".into(), "tags".into(), 9.into()]).is_none());
        // Key step into an array does not resolve
        assert!(tree.at(&["data".into(), "tags".into(), "x".into()]).is_none());
    }

    #[test]
    fn test_get_typed_extraction() {
        let tree = sample_tree();
        let title: Option<String> = tree.get(&["data".into(), "title".into()]).unwrap();
        assert_eq!(title.as_deref(), Some("Hello"));

        let count: Option<i64> = tree.get(&["count".into()]).unwrap();
        assert_eq!(count, Some(3));
    }

    #[test]
    fn test_get_missing_path_is_ok_none() {
        let tree = sample_tree();
        let missing: Option<String> = tree.get(&["nope".into()]).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_get_variant_mismatch_is_error() {
        let tree = sample_tree();
        let result: DecodeResult<Option<String>> = tree.get(&["count".into()]);
        assert_eq!(
            result.unwrap_err(),
            DecodeError::unexpected("String", "Int")
        );
    }

    #[test]
    fn test_ref_hierarchy_construction() {
        let database = Ref::new("prod");
        let doc = Ref::document("posts", "42").in_database(database.clone());
        assert_eq!(doc.id, "42");
        assert_eq!(doc.collection.as_deref(), Some(&Ref::new("posts")));
        assert_eq!(doc.database.as_deref(), Some(&database));
    }
}

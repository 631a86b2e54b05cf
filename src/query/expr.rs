//! Query expression tree
//!
//! An [`Expr`] is a strict superset of [`Value`] at the syntax level:
//! every value embeds as a literal, and call nodes add one reserved
//! wire key per server function. Trees are immutable and serialize
//! deterministically.

use std::collections::BTreeMap;

use serde_json::Map;

use crate::values::{codec, Value};

/// A node in a query expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A data literal, embedded without transformation
    Literal(Value),
    /// An array whose elements are themselves expressions
    Array(Vec<Expr>),
    /// An object literal whose field values are expressions
    Object(BTreeMap<String, Expr>),
    /// A server function call
    Fn(FnCall),
}

/// A function-call node: an ordered list of reserved wire keys and
/// their operand expressions.
///
/// Field order is fixed per call type, which keeps serialization
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct FnCall {
    fields: Vec<(&'static str, Expr)>,
}

impl FnCall {
    /// Creates a call node from its ordered wire fields.
    pub fn new(fields: Vec<(&'static str, Expr)>) -> Self {
        Self { fields }
    }

    /// The reserved wire keys and operands, in serialization order.
    pub fn fields(&self) -> &[(&'static str, Expr)] {
        &self.fields
    }
}

impl Expr {
    /// Builds an object-literal expression from key/expression pairs.
    pub fn object<K: Into<String>, E: Into<Expr>>(
        entries: impl IntoIterator<Item = (K, E)>,
    ) -> Self {
        Expr::Object(
            entries
                .into_iter()
                .map(|(k, e)| (k.into(), e.into()))
                .collect(),
        )
    }

    /// Serializes the tree into its wire JSON form.
    ///
    /// Structurally equal trees always produce identical JSON: object
    /// and call keys serialize in sorted order, literals reuse the
    /// value codec's tag conventions.
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            Expr::Literal(value) => codec::encode(value),
            Expr::Array(items) => {
                serde_json::Value::Array(items.iter().map(Expr::to_wire).collect())
            }
            Expr::Object(map) => {
                let mut entries = Map::new();
                for (key, expr) in map {
                    entries.insert(key.clone(), expr.to_wire());
                }
                let mut wrapper = Map::new();
                wrapper.insert("object".to_string(), serde_json::Value::Object(entries));
                serde_json::Value::Object(wrapper)
            }
            Expr::Fn(call) => {
                let mut entries = Map::new();
                for (key, expr) in call.fields() {
                    entries.insert((*key).to_string(), expr.to_wire());
                }
                serde_json::Value::Object(entries)
            }
        }
    }

    /// Serializes the tree to its canonical request-body text.
    pub fn to_wire_string(&self) -> String {
        serde_json::to_string(&self.to_wire()).expect("wire JSON serialization cannot fail")
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<crate::values::Ref> for Expr {
    fn from(r: crate::values::Ref) -> Self {
        Expr::Literal(Value::Ref(r))
    }
}

impl From<bool> for Expr {
    fn from(v: bool) -> Self {
        Expr::Literal(Value::Bool(v))
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::Literal(Value::Int(v))
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Literal(Value::Double(v))
    }
}

impl From<&str> for Expr {
    fn from(v: &str) -> Self {
        Expr::Literal(Value::String(v.to_string()))
    }
}

impl From<String> for Expr {
    fn from(v: String) -> Self {
        Expr::Literal(Value::String(v))
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }
}

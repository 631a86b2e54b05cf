//! Wire codec
//!
//! Lossless conversion between [`Value`] trees and the tagged-JSON wire
//! shapes. `decode(encode(v)) == v` for every representable value.
//!
//! Reserved tag keys: `@ref`, `@set`, `@ts`, `@date`, `@bytes` and
//! `object`. User objects always encode wrapped as `{"object": ...}` so
//! their keys can never collide with a reserved tag.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Map};

use super::errors::{DecodeError, DecodeResult};
use super::temporal;
use super::value::{Ref, SetRef, Value};

const TAG_REF: &str = "@ref";
const TAG_SET: &str = "@set";
const TAG_TS: &str = "@ts";
const TAG_DATE: &str = "@date";
const TAG_BYTES: &str = "@bytes";
const TAG_OBJECT: &str = "object";

/// Encodes a value into its wire JSON form.
///
/// Deterministic: equal values always produce byte-identical JSON text
/// (object keys are sorted, per-node tag fields are fixed).
pub fn encode(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!(i),
        Value::Double(d) => {
            // Non-finite doubles have no JSON form; sending one is a
            // caller bug, not a runtime condition.
            let number = serde_json::Number::from_f64(*d)
                .expect("non-finite numbers cannot be encoded");
            serde_json::Value::Number(number)
        }
        Value::String(s) => json!(s),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(encode).collect()),
        Value::Object(map) => json!({ TAG_OBJECT: encode_entries(map) }),
        Value::Ref(r) => encode_ref(r),
        Value::SetRef(set) => json!({ TAG_SET: encode_entries(&set.parameters) }),
        Value::Timestamp(ts) => json!({ TAG_TS: temporal::format_timestamp(ts) }),
        Value::Date(date) => json!({ TAG_DATE: temporal::format_date(date) }),
        Value::Bytes(bytes) => json!({ TAG_BYTES: BASE64.encode(bytes) }),
    }
}

/// Encodes a value to its canonical wire text.
pub fn to_wire_string(value: &Value) -> String {
    serde_json::to_string(&encode(value)).expect("wire JSON serialization cannot fail")
}

fn encode_entries(map: &BTreeMap<String, Value>) -> serde_json::Value {
    let mut out = Map::new();
    for (key, value) in map {
        out.insert(key.clone(), encode(value));
    }
    serde_json::Value::Object(out)
}

fn encode_ref(r: &Ref) -> serde_json::Value {
    let mut fields = Map::new();
    fields.insert("id".to_string(), json!(r.id));
    if let Some(collection) = &r.collection {
        fields.insert("collection".to_string(), encode_ref(collection));
    }
    if let Some(database) = &r.database {
        fields.insert("database".to_string(), encode_ref(database));
    }
    json!({ TAG_REF: fields })
}

/// Decodes wire JSON into a value.
///
/// Plain JSON scalars and arrays map directly; objects are checked for
/// a recognized reserved tag first and fall back to a literal object.
pub fn decode(wire: &serde_json::Value) -> DecodeResult<Value> {
    match wire {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => decode_number(n),
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Array(items) => {
            let decoded = items.iter().map(decode).collect::<DecodeResult<Vec<_>>>()?;
            Ok(Value::Array(decoded))
        }
        serde_json::Value::Object(map) => decode_object(map),
    }
}

/// Decodes wire text into a value.
pub fn from_wire_string(text: &str) -> DecodeResult<Value> {
    let wire: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::malformed(e.to_string()))?;
    decode(&wire)
}

fn decode_number(n: &serde_json::Number) -> DecodeResult<Value> {
    // Integers without a fractional/exponent part stay integers
    if let Some(i) = n.as_i64() {
        Ok(Value::Int(i))
    } else if let Some(f) = n.as_f64() {
        Ok(Value::Double(f))
    } else {
        Err(DecodeError::malformed(format!("unrepresentable number {}", n)))
    }
}

fn decode_object(map: &Map<String, serde_json::Value>) -> DecodeResult<Value> {
    if let Some(payload) = map.get(TAG_REF) {
        return decode_ref(payload).map(Value::Ref);
    }
    if let Some(payload) = map.get(TAG_SET) {
        let parameters = decode_entries(payload, TAG_SET)?;
        return Ok(Value::SetRef(SetRef::new(parameters)));
    }
    if let Some(payload) = map.get(TAG_TS) {
        let text = tag_string(payload, TAG_TS)?;
        return temporal::parse_timestamp(text).map(Value::Timestamp);
    }
    if let Some(payload) = map.get(TAG_DATE) {
        let text = tag_string(payload, TAG_DATE)?;
        return temporal::parse_date(text).map(Value::Date);
    }
    if let Some(payload) = map.get(TAG_BYTES) {
        let text = tag_string(payload, TAG_BYTES)?;
        let bytes = BASE64
            .decode(text)
            .map_err(|e| DecodeError::malformed_tag(TAG_BYTES, e.to_string()))?;
        return Ok(Value::Bytes(bytes));
    }
    if let Some(payload) = map.get(TAG_OBJECT) {
        return decode_entries(payload, TAG_OBJECT).map(Value::Object);
    }
    // No recognized tag: take every key literally
    let mut out = BTreeMap::new();
    for (key, value) in map {
        out.insert(key.clone(), decode(value)?);
    }
    Ok(Value::Object(out))
}

fn decode_entries(
    payload: &serde_json::Value,
    tag: &'static str,
) -> DecodeResult<BTreeMap<String, Value>> {
    let map = payload
        .as_object()
        .ok_or_else(|| DecodeError::malformed_tag(tag, "payload is not an object"))?;
    let mut out = BTreeMap::new();
    for (key, value) in map {
        out.insert(key.clone(), decode(value)?);
    }
    Ok(out)
}

fn tag_string<'a>(payload: &'a serde_json::Value, tag: &'static str) -> DecodeResult<&'a str> {
    payload
        .as_str()
        .ok_or_else(|| DecodeError::malformed_tag(tag, "payload is not a string"))
}

fn decode_ref(payload: &serde_json::Value) -> DecodeResult<Ref> {
    let fields = payload
        .as_object()
        .ok_or_else(|| DecodeError::malformed_tag(TAG_REF, "payload is not an object"))?;
    let id = fields
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DecodeError::malformed_tag(TAG_REF, "missing string id"))?
        .to_string();

    let collection = match fields.get("collection") {
        Some(parent) => Some(Box::new(decode_nested_ref(parent)?)),
        None => None,
    };
    let database = match fields.get("database") {
        Some(parent) => Some(Box::new(decode_nested_ref(parent)?)),
        None => None,
    };

    Ok(Ref {
        id,
        collection,
        database,
    })
}

fn decode_nested_ref(wire: &serde_json::Value) -> DecodeResult<Ref> {
    match decode(wire)? {
        Value::Ref(r) => Ok(r),
        other => Err(DecodeError::malformed_tag(
            TAG_REF,
            format!("parent is {}, expected a ref", other.variant_name()),
        )),
    }
}

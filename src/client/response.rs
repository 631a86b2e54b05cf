//! Response decoding
//!
//! Success bodies arrive as `{"resource": <tagged-value>}`, failures as
//! `{"errors": [{"code": ..., "description": ..., "position": [...]}]}`
//! with the HTTP status carrying the error class.

use serde::Deserialize;

use crate::values::{codec, Value};

use super::errors::{ClientError, ClientResult};

/// One structured error record from a server failure response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryError {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable description
    pub description: String,
    /// Path to the offending sub-expression, when the server provides
    /// one
    #[serde(default)]
    pub position: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    errors: Vec<QueryError>,
}

/// Decodes one HTTP response into the pipeline's result.
///
/// 2xx bodies must carry a decodable `resource`; non-2xx bodies are
/// surfaced verbatim as [`ClientError::Server`] when their error list
/// parses, and as [`ClientError::MalformedResponse`] otherwise.
pub fn decode_response(status: u16, body: &str) -> ClientResult<Value> {
    let wire: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

    if (200..300).contains(&status) {
        let resource = wire
            .get("resource")
            .ok_or_else(|| ClientError::MalformedResponse("missing resource field".to_string()))?;
        Ok(codec::decode(resource)?)
    } else {
        let parsed: ErrorBody = serde_json::from_value(wire)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        Err(ClientError::Server {
            status,
            errors: parsed.errors,
        })
    }
}

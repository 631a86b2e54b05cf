//! Structured JSON logger
//!
//! One log line per event, deterministic key ordering, explicit
//! severity. The pipeline logs each request's lifecycle under its
//! sequence id so concurrent queries stay distinguishable.

use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Wire-level detail
    Debug = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// Emits one structured JSON event line.
///
/// The `event` and `severity` keys always come first; remaining fields
/// serialize in sorted order so equal events produce identical lines.
pub fn log(severity: Severity, event: &str, fields: &[(&str, String)]) {
    let line = render(severity, event, fields);
    if severity >= Severity::Error {
        let _ = writeln!(io::stderr(), "{}", line);
    } else {
        let _ = writeln!(io::stdout(), "{}", line);
    }
}

/// Logs a request-scoped event, tagging it with the request id.
pub fn log_request(severity: Severity, event: &str, request_id: i64, fields: &[(&str, String)]) {
    let mut tagged = vec![("request_id", request_id.to_string())];
    tagged.extend(fields.iter().map(|(k, v)| (*k, v.clone())));
    log(severity, event, &tagged);
}

fn render(severity: Severity, event: &str, fields: &[(&str, String)]) -> String {
    let mut line = String::with_capacity(128);
    line.push('{');
    push_field(&mut line, "event", event);
    line.push(',');
    push_field(&mut line, "severity", severity.as_str());

    // Sort fields for deterministic output
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);
    for (key, value) in sorted {
        line.push(',');
        push_field(&mut line, key, value);
    }

    line.push('}');
    line
}

/// Appends one `"key":"value"` pair, escaped through serde_json.
fn push_field(line: &mut String, key: &str, value: &str) {
    line.push_str(&serde_json::to_string(key).expect("string serialization cannot fail"));
    line.push(':');
    line.push_str(&serde_json::to_string(value).expect("string serialization cannot fail"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_render_is_valid_json() {
        let line = render(Severity::Info, "QUERY_SENT", &[("endpoint", "x".to_string())]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "QUERY_SENT");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["endpoint"], "x");
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = render(
            Severity::Info,
            "E",
            &[("zebra", "1".to_string()), ("apple", "2".to_string())],
        );
        let b = render(
            Severity::Info,
            "E",
            &[("apple", "2".to_string()), ("zebra", "1".to_string())],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_escapes_field_values() {
        let line = render(
            Severity::Warn,
            "E",
            &[("msg", "quote \" and\nnewline".to_string())],
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["msg"], "quote \" and\nnewline");
    }

    #[test]
    fn test_event_key_comes_first() {
        let line = render(Severity::Info, "MY_EVENT", &[("a", "1".to_string())]);
        assert!(line.starts_with("{\"event\":\"MY_EVENT\""));
    }
}

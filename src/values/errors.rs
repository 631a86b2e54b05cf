//! # Value Errors
//!
//! Error types for value decoding and typed extraction.

use thiserror::Error;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while decoding wire JSON into values, or while
/// extracting a typed leaf out of a value tree.
///
/// All of these are recoverable by the caller; none are fatal.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    /// A path step resolved, but the leaf has an incompatible variant
    #[error("Expected {expected}, found {found}")]
    UnexpectedVariant {
        expected: &'static str,
        found: &'static str,
    },

    /// A reserved tag key carried a malformed payload
    #[error("Malformed {tag} payload: {reason}")]
    MalformedTag { tag: &'static str, reason: String },

    /// The input is not decodable at all
    #[error("Malformed wire value: {0}")]
    Malformed(String),
}

impl DecodeError {
    /// Create an unexpected-variant error
    pub fn unexpected(expected: &'static str, found: &'static str) -> Self {
        Self::UnexpectedVariant { expected, found }
    }

    /// Create a malformed-tag error
    pub fn malformed_tag(tag: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedTag {
            tag,
            reason: reason.into(),
        }
    }

    /// Create a generic malformed-input error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_variant_message() {
        let err = DecodeError::unexpected("String", "Int");
        assert_eq!(err.to_string(), "Expected String, found Int");
    }

    #[test]
    fn test_malformed_tag_message() {
        let err = DecodeError::malformed_tag("@ref", "missing id");
        assert_eq!(err.to_string(), "Malformed @ref payload: missing id");
    }
}

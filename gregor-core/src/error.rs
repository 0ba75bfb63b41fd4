//! Per-entry parse failures.
//!
//! None of these abort a push: the handler that hits one skips the entry
//! (or falls back to its default) and carries on.

use thiserror::Error;

/// A single pushed entry could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Body is not UTF-8 text.
    #[error("body is not valid UTF-8")]
    NotUtf8,

    /// Body is not a base-10 integer.
    #[error("invalid integer {value:?}: {reason}")]
    InvalidInteger {
        /// The offending text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Body is not the expected JSON shape.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Category does not carry the expected key.
    #[error("invalid category {0:?}")]
    InvalidCategory(String),

    /// Folder path could not be resolved for the current identity.
    #[error("unresolvable folder path {0:?}")]
    UnresolvableFolder(String),
}

impl ParseError {
    pub(crate) fn json(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

/// Parse a body as a base-10 integer, tolerating surrounding whitespace.
///
/// The whole trimmed body must be the integer: trailing text such as
/// `"300s"` or a fraction like `"1.5"` is rejected, not truncated.
pub(crate) fn parse_decimal<T>(body: &[u8]) -> Result<T, ParseError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let text = std::str::from_utf8(body).map_err(|_| ParseError::NotUtf8)?;
    let trimmed = text.trim();
    trimmed
        .parse::<T>()
        .map_err(|e| ParseError::InvalidInteger {
            value: trimmed.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_bodies() {
        assert_eq!(parse_decimal::<i64>(b"300"), Ok(300));
        assert_eq!(parse_decimal::<i64>(b" 42\n"), Ok(42));
        assert_eq!(parse_decimal::<i64>(b"-7"), Ok(-7));
    }

    #[test]
    fn rejects_trailing_text_instead_of_truncating() {
        for body in [&b"300s"[..], b"1.5", b"12 34"] {
            assert!(matches!(
                parse_decimal::<i64>(body),
                Err(ParseError::InvalidInteger { .. })
            ));
        }
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(matches!(
            parse_decimal::<i64>(b"notanumber"),
            Err(ParseError::InvalidInteger { .. })
        ));
        assert!(matches!(
            parse_decimal::<i64>(b""),
            Err(ParseError::InvalidInteger { .. })
        ));
        assert_eq!(parse_decimal::<i64>(&[0xff, 0xfe]), Err(ParseError::NotUtf8));
    }

    #[test]
    fn error_display() {
        let err = ParseError::UnresolvableFolder("/nope".into());
        assert_eq!(err.to_string(), "unresolvable folder path \"/nope\"");
    }
}

use std::collections::TryReserveError;
use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

use crate::url::UrlError;

/// What the parser tripped over. Carried by [`VconfError::Syntax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("key without value")]
    KeyWithoutValue,

    #[error("value without key")]
    ValueWithoutKey,

    #[error("missing ':' or '=' after key")]
    MissingSeparator,

    #[error("unterminated double quote")]
    UnterminatedQuote,

    #[error("unterminated single quote")]
    UnterminatedSingleQuote,
}

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum VconfError {
    #[error("Syntax error at line {line}, column {column}: {kind}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(vconf::syntax),
            help("each line is `key = value` or `key: value`; quote or escape special characters")
        )
    )]
    Syntax {
        kind: SyntaxErrorKind,
        line: usize,
        column: usize,
    },

    #[error("Out of memory while parsing configuration: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(vconf::allocation)))]
    Allocation(#[from] TryReserveError),

    #[error("Failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(vconf::io)))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Key not found: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(vconf::key_not_found)))]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(vconf::invalid_value)))]
    InvalidValue { key: String, reason: String },

    #[error("Invalid URL in '{key}': {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(vconf::invalid_url)))]
    InvalidUrl { key: String, source: UrlError },

    #[error("Unknown key '{key}' (line {line})")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(code(vconf::unknown_key), help("remove the key or check it for typos"))
    )]
    UnknownKey { key: String, line: usize },

    #[error("Unknown keys in configuration")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(vconf::unknown_keys)))]
    UnknownKeys(#[cfg_attr(feature = "rich-errors", related)] Vec<VconfError>),

    #[error("{0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(vconf::deserialize)))]
    Deserialize(String),
}

impl serde::de::Error for VconfError {
    fn custom<T: Display>(msg: T) -> Self {
        VconfError::Deserialize(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_formats_position_and_kind() {
        let err = VconfError::Syntax {
            kind: SyntaxErrorKind::MissingSeparator,
            line: 3,
            column: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("column 7"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn key_not_found_formats() {
        let err = VconfError::KeyNotFound("database.url".into());
        assert!(err.to_string().contains("database.url"));
    }

    #[test]
    fn invalid_url_includes_key_and_cause() {
        let err = VconfError::InvalidUrl {
            key: "upstream".into(),
            source: UrlError::InvalidPort("abc".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("upstream"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn unknown_key_formats_line() {
        let err = VconfError::UnknownKey {
            key: "typo_key".into(),
            line: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("typo_key"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn serde_custom_becomes_deserialize_variant() {
        let err = <VconfError as serde::de::Error>::custom("missing field `port`");
        assert!(matches!(err, VconfError::Deserialize(ref m) if m.contains("port")));
    }
}

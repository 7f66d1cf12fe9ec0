//! Diagnostics produced while loading, querying and writing a store
//!
//! The `Display` text of a [`ConfigError`] is exactly what ends up in the
//! store's error log.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{DecodeError, TypeTag};

/// How bad a recorded error is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Recoverable: the offending line or call was skipped
    Normal,
    /// Persisted state may not match memory
    Fatal,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Line one in config has to be a comment, first line skipped")]
    MissingHeader,

    #[error("Invalid UTF-8 at line {line}, read with replacement characters")]
    InvalidEncoding { line: usize },

    #[error("Empty line at line {line}")]
    EmptyLine { line: usize },

    #[error("Invalid type '{tag}' at line {line}")]
    InvalidType { tag: char, line: usize },

    #[error("Expected '<digit>_' prefix at line {line}")]
    MalformedPrefix { line: usize },

    #[error("Invalid value at line {line}. No '=' found")]
    MissingSeparator { line: usize },

    #[error("Invalid identifier '{0}': must be non-empty without '=' or line breaks")]
    InvalidId(String),

    #[error("Value with id '{0}' already exists")]
    Duplicate(String),

    #[error("Value with id '{0}' does not exist")]
    Missing(String),

    #[error("Value '{id}' is stored as {stored}, not {requested}")]
    TypeMismatch {
        id: String,
        stored: TypeTag,
        requested: TypeTag,
    },

    #[error("Cannot read {tag} value of '{id}': {}", join_failures(.failures))]
    Conversion {
        id: String,
        tag: TypeTag,
        failures: Vec<DecodeError>,
    },

    #[error("Cannot replace '{id}': '{value}' is not a valid {tag}")]
    InvalidReplacement {
        id: String,
        tag: TypeTag,
        value: String,
    },

    #[error("Value of '{0}' has no '0x' prefix")]
    MissingHexPrefix(String),

    #[error("File {} does not exist or cannot be accessed", .0.display())]
    Unreadable(PathBuf),

    #[error("Couldn't write to {}: {source}", .path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn join_failures(failures: &[DecodeError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ConfigError {
    pub fn severity(&self) -> Severity {
        match self {
            ConfigError::Unwritable { .. } => Severity::Fatal,
            _ => Severity::Normal,
        }
    }

    /// Breaks a multi-component conversion failure into one error per component
    ///
    /// Every other error comes back as a single-element list.
    pub fn split_components(self) -> Vec<ConfigError> {
        match self {
            ConfigError::Conversion { id, tag, failures } if failures.len() > 1 => failures
                .into_iter()
                .map(|failure| ConfigError::Conversion {
                    id: id.clone(),
                    tag,
                    failures: vec![failure],
                })
                .collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_line() {
        assert_eq!(
            ConfigError::InvalidType { tag: '9', line: 4 }.to_string(),
            "Invalid type '9' at line 4"
        );
        assert_eq!(
            ConfigError::MissingSeparator { line: 2 }.to_string(),
            "Invalid value at line 2. No '=' found"
        );
    }

    #[test]
    fn only_write_failures_are_fatal() {
        let err = ConfigError::Unwritable {
            path: PathBuf::from("/nope/cfg.ini"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.severity(), Severity::Fatal);
        assert_eq!(ConfigError::Missing("x".into()).severity(), Severity::Normal);
    }

    #[test]
    fn conversion_lists_every_component() {
        let err = ConfigError::Conversion {
            id: "area".into(),
            tag: TypeTag::Rect,
            failures: vec![
                DecodeError::Component { index: 0, text: "a".into() },
                DecodeError::Component { index: 2, text: "b".into() },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Cannot read rect value of 'area': component 0 ('a') is not an integer; \
             component 2 ('b') is not an integer"
        );
    }

    #[test]
    fn split_components_yields_one_error_each() {
        let err = ConfigError::Conversion {
            id: "area".into(),
            tag: TypeTag::Rect,
            failures: vec![
                DecodeError::Component { index: 0, text: "a".into() },
                DecodeError::Component { index: 2, text: "b".into() },
            ],
        };
        let parts = err.split_components();
        assert_eq!(parts.len(), 2);
        assert!(parts[1].to_string().contains("component 2"));

        assert_eq!(ConfigError::MissingHeader.split_components().len(), 1);
    }
}

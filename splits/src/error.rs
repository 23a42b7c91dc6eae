use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures that happen before any query runs: the file could not be read,
/// decoded or parsed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to open file '{}'. Message: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes could not be decoded as text, so they cannot be JSON.
    #[error("Invalid JSON: {0}")]
    Encoding(String),

    /// `text` is the decoded input, kept so callers can point at the
    /// offending line.
    #[error("Invalid JSON: {error}")]
    InvalidJson {
        #[source]
        error: serde_json::Error,
        text: String,
    },

    #[error("Invalid JSON: nesting deeper than {limit} levels at line {line} column {column}")]
    TooDeep {
        limit: usize,
        line: usize,
        column: usize,
        text: String,
    },
}

impl LoadError {
    /// One-based line and byte column of the position the parse failed at.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            LoadError::InvalidJson { error, .. } => Some((error.line(), error.column())),
            LoadError::TooDeep { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }

    /// The decoded input, for errors that have a [`location`](Self::location).
    pub fn source_text(&self) -> Option<&str> {
        match self {
            LoadError::InvalidJson { text, .. } | LoadError::TooDeep { text, .. } => {
                Some(text.as_str())
            }
            _ => None,
        }
    }
}

/// Failures selecting a query from the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    #[error("Missing split index")]
    MissingSplitIndex,

    #[error("Missing split index or field name")]
    MissingIndexOrField,

    #[error("Invalid split index: {0}")]
    InvalidIndex(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

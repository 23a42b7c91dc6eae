use std::{fmt::Display, num::IntErrorKind};

use log::debug;

use crate::{render, Document, QueryError};

/// Printed by `get_split` when there is no split at the requested index.
pub const EMPTY_SPLIT: &str = "{}";

/// Query names and arguments, formatted for a usage message.
pub const QUERY_HELP: &str = "\
Queries:
  validate              - Validate JSON syntax
  count                 - Count splits
  has_splits            - Check if splits array exists
  get_split N           - Get split at index N as JSON
  get_field N field     - Get field from split N";

/// A split index as given on the command line. Negative or unrepresentably
/// large indices are kept as [`SplitIndex::OutOfRange`] rather than
/// rejected, since they simply select nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitIndex {
    At(usize),
    OutOfRange,
}

impl SplitIndex {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        match raw.trim().parse::<i64>() {
            Ok(index) => Ok(usize::try_from(index)
                .map(SplitIndex::At)
                .unwrap_or(SplitIndex::OutOfRange)),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    Ok(SplitIndex::OutOfRange)
                }
                _ => Err(QueryError::InvalidIndex(raw.to_string())),
            },
        }
    }

    fn get(self) -> Option<usize> {
        match self {
            SplitIndex::At(index) => Some(index),
            SplitIndex::OutOfRange => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Validate,
    HasSplits,
    Count,
    GetSplit { index: SplitIndex },
    GetField { index: SplitIndex, field: String },
}

impl Query {
    /// Selects a query by name. `args` are the command line arguments that
    /// follow the query name; any beyond what the query needs are ignored.
    pub fn parse<S: AsRef<str>>(name: &str, args: &[S]) -> Result<Self, QueryError> {
        let (query, used) = match name {
            "validate" => (Query::Validate, 0),
            "has_splits" => (Query::HasSplits, 0),
            "count" => (Query::Count, 0),
            "get_split" => {
                let raw = args.first().ok_or(QueryError::MissingSplitIndex)?;
                let index = SplitIndex::parse(raw.as_ref())?;
                (Query::GetSplit { index }, 1)
            }
            "get_field" => {
                let (raw, field) = match args {
                    [raw, field, ..] => (raw, field),
                    _ => return Err(QueryError::MissingIndexOrField),
                };
                let index = SplitIndex::parse(raw.as_ref())?;
                (
                    Query::GetField {
                        index,
                        field: field.as_ref().to_string(),
                    },
                    2,
                )
            }
            other => return Err(QueryError::UnknownQuery(other.to_string())),
        };

        if args.len() > used {
            debug!(
                "ignoring {} extra argument(s) to {}",
                args.len() - used,
                query.name()
            );
        }

        Ok(query)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Query::Validate => "validate",
            Query::HasSplits => "has_splits",
            Query::Count => "count",
            Query::GetSplit { .. } => "get_split",
            Query::GetField { .. } => "get_field",
        }
    }

    /// Runs the query. Every query produces a single line of output; a
    /// missing split or field is an empty result, never an error.
    pub fn run(&self, document: &Document) -> String {
        match self {
            Query::Validate => "valid".to_string(),
            Query::HasSplits => document.has_splits().to_string(),
            Query::Count => document.split_count().to_string(),
            Query::GetSplit { index } => index
                .get()
                .and_then(|index| document.split(index))
                .map(render::compact)
                .unwrap_or_else(|| EMPTY_SPLIT.to_string()),
            Query::GetField { index, field } => index
                .get()
                .and_then(|index| document.field(index, field))
                .map(|value| render::plain_text(value).into_owned())
                .unwrap_or_default(),
        }
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::GetSplit { index } => write!(f, "{} {}", self.name(), DisplayIndex(*index)),
            Query::GetField { index, field } => {
                write!(f, "{} {} {}", self.name(), DisplayIndex(*index), field)
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}

struct DisplayIndex(SplitIndex);

impl Display for DisplayIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            SplitIndex::At(index) => write!(f, "{}", index),
            SplitIndex::OutOfRange => write!(f, "<out of range>"),
        }
    }
}

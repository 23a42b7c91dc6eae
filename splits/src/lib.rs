#![doc = include_str!("../README.md")]

mod document;
pub mod encoding;
mod error;
mod query;
pub mod render;

pub use document::{Document, Splits, MAX_DEPTH, SPLITS_KEY};
pub use error::{Error, LoadError, QueryError};
pub use query::{Query, SplitIndex, EMPTY_SPLIT, QUERY_HELP};

use std::path::Path;

use log::info;

/// Loads the document at `path` and runs the named query against it.
///
/// The document is loaded before the query name is looked at, so a missing
/// or malformed file is reported even when the query is unknown.
pub fn run<P, S>(path: P, query: &str, args: &[S]) -> Result<String, Error>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    let document = Document::load(path)?;
    let query = Query::parse(query, args)?;
    info!("running {} against {}", query, path.display());
    Ok(query.run(&document))
}

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
    str::FromStr,
};

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::{encoding, LoadError};

/// The key holding the split records.
pub const SPLITS_KEY: &str = "splits";

/// Deepest array/object nesting a document may have.
pub const MAX_DEPTH: usize = 512;

/// A parsed JSON document. Nothing in this crate mutates it after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    value: Value,
}

/// What the document holds under [`SPLITS_KEY`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Splits<'doc> {
    /// The document is not an object, or has no `splits` key.
    Absent,
    Array(&'doc [Value]),
    /// Present, but not an array.
    Other(&'doc Value),
}

impl Document {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = match File::open(path) {
            Ok(file) => read_to_end(BufReader::new(file)).map_err(|source| LoadError::Open {
                path: path.to_path_buf(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(LoadError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(LoadError::Open {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, LoadError> {
        let (text, encoding) = encoding::decode(bytes)?;
        debug!("decoded input as {:?}", encoding);
        text.parse()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn splits(&self) -> Splits<'_> {
        match self.value.get(SPLITS_KEY) {
            None => Splits::Absent,
            Some(Value::Array(splits)) => Splits::Array(splits),
            Some(other) => Splits::Other(other),
        }
    }

    pub fn has_splits(&self) -> bool {
        matches!(self.splits(), Splits::Array(_))
    }

    /// Number of split records. A `splits` member that is not an array
    /// counts as zero.
    pub fn split_count(&self) -> usize {
        match self.splits() {
            Splits::Absent => 0,
            Splits::Array(splits) => splits.len(),
            Splits::Other(other) => {
                warn!(
                    "\"{}\" is {}, not an array; counting it as 0",
                    SPLITS_KEY,
                    kind_of(other)
                );
                0
            }
        }
    }

    pub fn split(&self, index: usize) -> Option<&Value> {
        match self.splits() {
            Splits::Array(splits) => splits.get(index),
            _ => None,
        }
    }

    /// Looks up `name` in the split at `index`. Splits that are not objects
    /// have no fields.
    pub fn field(&self, index: usize, name: &str) -> Option<&Value> {
        self.split(index)?.as_object()?.get(name)
    }
}

impl FromStr for Document {
    type Err = LoadError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        check_depth(text)?;

        // nesting is already bounded by check_depth
        let mut deserializer = serde_json::Deserializer::from_str(text);
        deserializer.disable_recursion_limit();
        let parsed = Value::deserialize(&mut deserializer).and_then(|value| {
            deserializer.end()?;
            Ok(value)
        });

        match parsed {
            Ok(value) => Ok(Self { value }),
            Err(error) => Err(LoadError::InvalidJson {
                error,
                text: text.to_string(),
            }),
        }
    }
}

/// Rejects input whose brackets nest deeper than [`MAX_DEPTH`], reporting
/// the bracket that crossed the limit. Brackets inside strings are skipped.
fn check_depth(text: &str) -> Result<(), LoadError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut line = 1;
    let mut line_start = 0;

    for (offset, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'\n' => {
                line += 1;
                line_start = offset + 1;
            }
            b'[' | b'{' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(LoadError::TooDeep {
                        limit: MAX_DEPTH,
                        line,
                        column: offset - line_start + 1,
                        text: text.to_string(),
                    });
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self { value }
    }
}

fn read_to_end<R: Read>(mut reader: BufReader<R>) -> io::Result<Vec<u8>> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    Ok(input)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

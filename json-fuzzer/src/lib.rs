use std::iter::Filter;

use rand::{
    distributions::{DistIter, Standard},
    rngs::ThreadRng,
    thread_rng, Rng, RngCore,
};
use serde_json::{Map, Number, Value};

const MAX_DEPTH: u32 = 3;

/// A randomly generated document together with the value it encodes.
#[derive(Debug, Clone)]
pub struct FuzzedDocument {
    pub json: String,
    pub value: Value,
}

impl FuzzedDocument {
    /// The generated `splits` array, if the document has one.
    pub fn splits(&self) -> Option<&Vec<Value>> {
        self.value.get("splits")?.as_array()
    }
}

/// An endless stream of split documents. Most carry a `splits` array of
/// objects with random fields; some have no `splits` key, and some have one
/// that is not an array.
pub fn fuzz() -> impl Iterator<Item = FuzzedDocument> {
    SplitsFuzzer(
        thread_rng(),
        thread_rng()
            .sample_iter(Standard)
            .filter(|ch| (*ch as u32) < 0x10FFFF),
    )
}

struct SplitsFuzzer<F: FnMut(&char) -> bool>(
    ThreadRng,
    Filter<DistIter<Standard, ThreadRng, char>, F>,
);

impl<F: FnMut(&char) -> bool> SplitsFuzzer<F> {
    fn next_string(&mut self) -> String {
        let mut string = String::new();
        let end = self.0.next_u32() % 24;
        for _ in 0..end {
            match self.0.next_u32() % 8 {
                0 => string.push('"'),
                1 => string.push('\\'),
                2 => string.push('\n'),
                3 => string.push('\t'),
                _ => match self.1.next() {
                    None => unreachable!("char producer should always produce a char"),
                    Some(ch) => string.push(ch),
                },
            }
        }
        string
    }

    fn next_key(&mut self) -> String {
        match self.0.next_u32() % 6 {
            0 => "name".to_string(),
            1 => "start".to_string(),
            2 => "end".to_string(),
            3 => "title".to_string(),
            _ => self.next_string(),
        }
    }

    fn next_number(&mut self) -> Value {
        match self.0.next_u32() % 3 {
            0 => Value::Number(Number::from(self.0.next_u32())),
            1 => Value::Number(Number::from(-(self.0.next_u32() as i64))),
            _ => {
                // quarters print and parse back exactly
                let float = (self.0.next_u32() % 4_000_000) as f64 / 4.0 - 500_000.0;
                Number::from_f64(float)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
    }

    fn next_value(&mut self, depth: u32) -> Value {
        let kinds = if depth >= MAX_DEPTH { 4 } else { 6 };
        match self.0.next_u32() % kinds {
            0 => Value::Null,
            1 => Value::Bool(self.0.gen()),
            2 => self.next_number(),
            3 => Value::String(self.next_string()),
            4 => {
                let len = self.0.next_u32() % 4;
                Value::Array((0..len).map(|_| self.next_value(depth + 1)).collect())
            }
            _ => self.next_object(depth + 1),
        }
    }

    fn next_object(&mut self, depth: u32) -> Value {
        let mut map = Map::new();
        for _ in 0..(self.0.next_u32() % 6) {
            let key = self.next_key();
            let value = self.next_value(depth);
            map.insert(key, value);
        }
        Value::Object(map)
    }

    fn next_splits(&mut self) -> Value {
        match self.0.next_u32() % 10 {
            0 => self.next_value(MAX_DEPTH),
            1 => self.next_object(1),
            _ => {
                let len = self.0.next_u32() % 12;
                Value::Array((0..len).map(|_| self.next_object(1)).collect())
            }
        }
    }
}

impl<F: FnMut(&char) -> bool> Iterator for SplitsFuzzer<F> {
    type Item = FuzzedDocument;

    fn next(&mut self) -> Option<Self::Item> {
        let mut document = Map::new();
        if self.0.next_u32() % 2 == 0 {
            document.insert("source".to_string(), Value::String(self.next_string()));
        }
        if self.0.next_u32() % 8 != 0 {
            let splits = self.next_splits();
            document.insert("splits".to_string(), splits);
        }
        let value = Value::Object(document);

        let json = match self.0.next_u32() % 2 {
            0 => serde_json::to_string(&value),
            _ => serde_json::to_string_pretty(&value),
        }
        .unwrap_or_else(|_| unreachable!("maps with string keys always serialize"));

        Some(FuzzedDocument { json, value })
    }
}

#[cfg(test)]
mod tests {
    use crate::fuzz;

    #[test]
    fn generated_json_matches_value() {
        for document in fuzz().take(200) {
            let reparsed: serde_json::Value = serde_json::from_str(&document.json).unwrap();
            assert_eq!(document.value, reparsed);
        }
    }
}

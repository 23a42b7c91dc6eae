use std::borrow::Cow;

use serde_json::Value;

/// Renders a value the way a shell script wants to read it: strings come
/// out raw, `null` as nothing, and containers as compact JSON.
pub fn plain_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(str) => Cow::Borrowed(str),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(number) => Cow::Owned(number.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(compact(value)),
    }
}

/// Single-line JSON with no padding between tokens.
pub fn compact(value: &Value) -> String {
    value.to_string()
}

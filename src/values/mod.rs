pub mod literal;

use serde_json::{Number, Value};
use std::fmt;
use tracing::debug;

pub use literal::{float_text, parse_list_literal, MalformedListLiteral};

/// A field value typed from free-text form input.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    EmptyString,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    ListOfString(Vec<String>),
}

/// Types raw form input.
///
/// The steps run in a fixed order and the first one that accepts the text
/// wins:
///
/// 1. empty or whitespace-only text is `EmptyString`
/// 2. `[...]` text that reads as a list literal is `ListOfString`
///    (a malformed literal falls through to the next steps)
/// 3. text containing a comma is split, trimmed and filtered into `ListOfString`
/// 4. text containing a `.` that parses as a float is `Float`
/// 5. text that parses as an integer is `Integer`
/// 6. `true`/`false` in any case is `Boolean`
/// 7. anything else is the trimmed `String`
pub fn parse_input_value(raw: &str) -> TypedValue {
    let text = raw.trim();
    if text.is_empty() {
        return TypedValue::EmptyString;
    }

    if text.starts_with('[') && text.ends_with(']') {
        match parse_list_literal(text) {
            Ok(items) => return TypedValue::ListOfString(items),
            Err(e) => debug!("'{}' is not a list literal ({}), falling through", text, e),
        }
    }

    if text.contains(',') {
        return TypedValue::ListOfString(split_comma_list(text));
    }

    if text.contains('.') {
        if let Ok(f) = text.parse::<f64>() {
            return TypedValue::Float(f);
        }
    }

    if let Ok(i) = text.parse::<i64>() {
        return TypedValue::Integer(i);
    }

    match text.to_lowercase().as_str() {
        "true" => TypedValue::Boolean(true),
        "false" => TypedValue::Boolean(false),
        _ => TypedValue::String(text.to_string()),
    }
}

fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Projects a value back into form text.
///
/// Not a strict inverse of [`parse_input_value`]: a single string holding a
/// comma re-parses as a list.
pub fn format_value_for_input(value: &TypedValue) -> String {
    match value {
        TypedValue::EmptyString => String::new(),
        TypedValue::String(s) => s.clone(),
        TypedValue::Integer(i) => i.to_string(),
        TypedValue::Float(f) => float_text(*f),
        TypedValue::Boolean(b) => b.to_string(),
        TypedValue::ListOfString(items) => items.join(", "),
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value_for_input(self))
    }
}

impl TypedValue {
    /// The JSON form handed to the scoring engine. Empty input is `null`.
    pub fn to_storage_value(&self) -> Value {
        match self {
            TypedValue::EmptyString => Value::Null,
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Integer(i) => Value::Number((*i).into()),
            TypedValue::Float(f) => Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(float_text(*f))),
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::ListOfString(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    pub fn from_storage_value(value: &Value) -> Self {
        match value {
            Value::Null => TypedValue::EmptyString,
            Value::String(s) if s.is_empty() => TypedValue::EmptyString,
            Value::String(s) => TypedValue::String(s.clone()),
            Value::Bool(b) => TypedValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => TypedValue::Integer(i),
                None => TypedValue::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::Array(items) => TypedValue::ListOfString(
                items.iter().filter_map(storage_value_to_string).collect(),
            ),
            Value::Object(_) => TypedValue::String(value.to_string()),
        }
    }
}

/// String form of a stored scalar; `None` for nulls.
pub(crate) fn storage_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_f64() => n.as_f64().map(float_text),
        other => Some(other.to_string()),
    }
}

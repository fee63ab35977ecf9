//! Values carried by script configurations.
//!
//! A [`Value`] is what a script receives as one keyword argument: a scalar,
//! a sequence or a string-keyed mapping. Values come in from plain JSON data
//! (the builder boundary) or from YAML text (the parse boundary), and both
//! conversions reject shapes the configuration text cannot express.

use indexmap::IndexMap;

use crate::error::ValidationError;
use crate::serialization::quoting::requires_quotes;

/// Keys are written as implicit YAML keys, which loaders cap at 1024 characters
/// after quoting and escaping.
pub const MAX_KEY_CHARS: usize = 128;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    /// Always finite.
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

/// How a value is written in configuration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Null, booleans, numbers and strings that are safe to write plain.
    Scalar,
    /// A string that would be misread if written plain.
    QuotedString,
    Sequence,
    Mapping,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(s) if requires_quotes(s) => ValueKind::QuotedString,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
            _ => ValueKind::Scalar,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Check a value assembled in Rust, where non-finite floats can slip in.
    pub(crate) fn validate(&self, path: &str) -> Result<(), ValidationError> {
        match self {
            Value::Float(f) if !f.is_finite() => Err(unsupported(path, format!("non-finite float {}", f))),
            Value::Sequence(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, item)| item.validate(&format!("{}[{}]", path, i))),
            Value::Mapping(map) => map.iter().try_for_each(|(key, item)| {
                let nested = format!("{}.{}", path, key);
                check_key(key, &nested)?;
                item.validate(&nested)
            }),
            _ => Ok(()),
        }
    }
}

pub(crate) fn check_key(key: &str, path: &str) -> Result<(), ValidationError> {
    if key.chars().count() > MAX_KEY_CHARS {
        return Err(unsupported(path, format!("key longer than {} characters", MAX_KEY_CHARS)));
    }
    Ok(())
}

fn unsupported(path: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::UnsupportedValue {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Classify raw JSON input without converting it.
///
/// Fails for the same inputs `Value::try_from` rejects, with the same paths.
pub fn classify(raw: &serde_json::Value) -> Result<ValueKind, ValidationError> {
    classify_at(raw, "$")
}

fn classify_at(raw: &serde_json::Value, path: &str) -> Result<ValueKind, ValidationError> {
    match raw {
        serde_json::Value::String(s) if requires_quotes(s) => Ok(ValueKind::QuotedString),
        serde_json::Value::Number(n) if n.as_i64().is_none() && !n.is_f64() => {
            Err(unsupported(path, format!("integer {} does not fit in 64 signed bits", n)))
        }
        serde_json::Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                classify_at(item, &format!("{}[{}]", path, i))?;
            }
            Ok(ValueKind::Sequence)
        }
        serde_json::Value::Object(map) => {
            for (key, item) in map {
                let nested = format!("{}.{}", path, key);
                check_key(key, &nested)?;
                classify_at(item, &nested)?;
            }
            Ok(ValueKind::Mapping)
        }
        _ => Ok(ValueKind::Scalar),
    }
}

pub(crate) fn from_json(raw: serde_json::Value, path: &str) -> Result<Value, ValidationError> {
    Ok(match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if n.is_f64() {
                match n.as_f64() {
                    Some(f) if f.is_finite() => Value::Float(f),
                    _ => return Err(unsupported(path, format!("non-finite number {}", n))),
                }
            } else {
                return Err(unsupported(path, format!("integer {} does not fit in 64 signed bits", n)));
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Sequence(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| from_json(item, &format!("{}[{}]", path, i)))
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, item)| {
                    let nested_path = format!("{}.{}", path, key);
                    check_key(&key, &nested_path)?;
                    let nested = from_json(item, &nested_path)?;
                    Ok((key, nested))
                })
                .collect::<Result<_, ValidationError>>()?,
        ),
    })
}

pub(crate) fn from_yaml(raw: serde_yaml::Value, path: &str) -> Result<Value, ValidationError> {
    Ok(match raw {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if n.is_f64() {
                match n.as_f64() {
                    Some(f) if f.is_finite() => Value::Float(f),
                    _ => return Err(unsupported(path, format!("non-finite number {}", n))),
                }
            } else {
                return Err(unsupported(path, format!("integer {} does not fit in 64 signed bits", n)));
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| from_yaml(item, &format!("{}[{}]", path, i)))
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (key, item) in map {
                let key = match key {
                    serde_yaml::Value::String(key) => key,
                    other => return Err(unsupported(path, format!("non-string mapping key {:?}", other))),
                };
                let nested_path = format!("{}.{}", path, key);
                check_key(&key, &nested_path)?;
                let nested = from_yaml(item, &nested_path)?;
                out.insert(key, nested);
            }
            Value::Mapping(out)
        }
        serde_yaml::Value::Tagged(tagged) => {
            return Err(unsupported(path, format!("tagged value {}", tagged.tag)))
        }
    })
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ValidationError;

    fn try_from(raw: serde_json::Value) -> Result<Self, Self::Error> {
        from_json(raw, "$")
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = ValidationError;

    fn try_from(raw: serde_yaml::Value) -> Result<Self, Self::Error> {
        from_yaml(raw, "$")
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(v: IndexMap<String, Value>) -> Self {
        Value::Mapping(v)
    }
}

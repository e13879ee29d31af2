//! Loaded leaf values.
//!
//! Loaders turn raw paths into [`Value`]s. Each value reports a [`ValueKind`],
//! the stable type identity that is folded into the fingerprint and mapped to
//! a concrete type name by each declaration emitter.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// A value produced by a loader (or passed through unchanged).
///
/// # Examples
///
/// ```
/// use pathtyped_core::{Value, ValueKind};
///
/// let value = Value::Text("hello".to_string());
/// assert_eq!(value.kind(), ValueKind::Text);
/// assert_eq!(value.as_text(), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text content
    Text(String),
    /// Raw file content
    Bytes(Vec<u8>),
    /// Parsed JSON document
    Json(serde_json::Value),
    /// A filesystem path (unhandled leaves pass through as paths)
    Path(PathBuf),
    /// Signed integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean flag
    Bool(bool),
}

/// Stable type identity of a [`Value`].
///
/// JSON values report the kind of their top-level node, so a JSON file holding
/// an object is a [`ValueKind::Map`] and one holding a string is a
/// [`ValueKind::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Text string
    Text,
    /// Byte buffer
    Bytes,
    /// Filesystem path
    Path,
    /// Integer number
    Integer,
    /// Floating point number
    Float,
    /// Boolean
    Bool,
    /// Untyped key/value map (JSON object)
    Map,
    /// Untyped list (JSON array)
    List,
    /// Explicit null (JSON null)
    Null,
}

impl ValueKind {
    /// Returns the name folded into fingerprints.
    ///
    /// These names are part of the artifact format: changing one changes
    /// every fingerprint that contains it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Path => "path",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Map => "map",
            Self::List => "list",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Path(_) => ValueKind::Path,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Json(json) => match json {
                serde_json::Value::Null => ValueKind::Null,
                serde_json::Value::Bool(_) => ValueKind::Bool,
                serde_json::Value::Number(n) => {
                    if n.is_f64() {
                        ValueKind::Float
                    } else {
                        ValueKind::Integer
                    }
                }
                serde_json::Value::String(_) => ValueKind::Text,
                serde_json::Value::Array(_) => ValueKind::List,
                serde_json::Value::Object(_) => ValueKind::Map,
            },
        }
    }

    /// Returns the text content, if this is text (or a JSON string).
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the raw bytes, if this is a byte buffer.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the JSON document, if this value was parsed as JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(json) => Some(json),
            _ => None,
        }
    }

    /// Returns the path, if this is a path.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bytes(b) => serializer.collect_seq(b),
            Self::Json(json) => json.serialize(serializer),
            Self::Path(p) => p.serialize(serializer),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<PathBuf> for Value {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Self::Json(json)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

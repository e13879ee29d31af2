//! The resolved, read-only resource tree.
//!
//! After construction every map of the resource tree is a [`Record`] with
//! named fields, every sequence is a fixed-size tuple and every leaf is a
//! loaded [`Value`] (or [`Resource::None`] for absent slots). Field names
//! and order match the emitted declaration exactly.
//!
//! # Examples
//!
//! ```
//! use pathtyped_core::{Record, Resource, Value};
//!
//! let root = Resource::Record(Record::new(
//!     "root",
//!     vec![
//!         ("main".to_string(), Resource::Value(Value::from("hello"))),
//!         (
//!             "speech".to_string(),
//!             Resource::Tuple(vec![Resource::None, Resource::Value(Value::from("hi"))]),
//!         ),
//!     ],
//! ));
//!
//! assert_eq!(root["main"].as_text(), Some("hello"));
//! assert!(root["speech"][0].is_none());
//! assert_eq!(root.lookup("speech[1]").and_then(Resource::as_text), Some("hi"));
//! ```

use crate::location::{Segment, parse_path};
use crate::value::Value;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;
use std::path::Path;

static NONE: Resource = Resource::None;

/// A node of the resolved resource tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Named fields, produced from a map node
    Record(Record),
    /// Fixed-size positional elements, produced from a sequence node
    Tuple(Vec<Resource>),
    /// A loaded leaf
    Value(Value),
    /// An absent slot
    None,
}

/// A record with ordered, named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    fields: Vec<(String, Resource)>,
}

impl Record {
    /// Creates a record from its type name and ordered fields.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<(String, Resource)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Type name of the record (the key it was found under, or `root`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Resource {
    /// Returns the record field called `name`.
    ///
    /// Returns `None` for non-records and unknown fields.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Record(record) => record.get(name),
            _ => None,
        }
    }

    /// Returns the tuple element at `index`.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Self> {
        match self {
            Self::Tuple(items) => items.get(index),
            _ => None,
        }
    }

    /// Follows a location path such as `audio.bgm[2]` from this node.
    ///
    /// A leading `root` segment is skipped. Returns `None` when the path is
    /// malformed or does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::{Record, Resource, Value};
    ///
    /// let tiles = Resource::Record(Record::new(
    ///     "tiles",
    ///     vec![("grass".to_string(), Resource::Tuple(vec![Resource::Value(Value::from(1i64))]))],
    /// ));
    /// let root = Resource::Record(Record::new("root", vec![("tiles".to_string(), tiles)]));
    ///
    /// assert!(root.lookup("root.tiles.grass[0]").is_some());
    /// assert!(root.lookup("tiles.water").is_none());
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Self> {
        parse_path(path)?
            .into_iter()
            .try_fold(self, |node, segment| match segment {
                Segment::Field(name) => node.get(name),
                Segment::Index(index) => node.at(index),
            })
    }

    /// Field names of a record, in declaration order.
    ///
    /// Empty for anything that is not a record.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Self::Record(record) => record.fields().map(|(k, _)| k).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the record, if this node is one.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the tuple elements, if this node is a tuple.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the loaded value, if this node is a leaf.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns text content of a text leaf.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_text)
    }

    /// Returns raw bytes of a bytes leaf.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.as_value().and_then(Value::as_bytes)
    }

    /// Returns the document of a JSON leaf.
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        self.as_value().and_then(Value::as_json)
    }

    /// Returns the path of a path leaf.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        self.as_value().and_then(Value::as_path)
    }

    /// Returns `true` for absent slots.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Converts the tree into a caller-defined type.
    ///
    /// Records map to structs (or maps), tuples to tuples (or vectors), and
    /// absent slots to `()`/`Option::None`. This is the intended way to use
    /// the structs generated for Rust callers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if the tree does not fit `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::{Record, Resource, Value};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Root {
    ///     main: String,
    /// }
    ///
    /// let root = Resource::Record(Record::new(
    ///     "root",
    ///     vec![("main".to_string(), Resource::Value(Value::from("hello")))],
    /// ));
    /// let typed: Root = root.deserialize().unwrap();
    /// assert_eq!(typed.main, "hello");
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let json = serde_json::to_value(self).map_err(|e| Error::SerializationError {
            message: format!("failed to serialize resource tree: {e}"),
            source: Some(e),
        })?;
        serde_json::from_value(json).map_err(|e| Error::SerializationError {
            message: format!(
                "resource tree does not match {}: {e}",
                std::any::type_name::<T>()
            ),
            source: Some(e),
        })
    }
}

impl Index<&str> for Resource {
    type Output = Self;

    /// Returns the named field, or [`Resource::None`] if there is none.
    fn index(&self, name: &str) -> &Self::Output {
        self.get(name).unwrap_or(&NONE)
    }
}

impl Index<usize> for Resource {
    type Output = Self;

    /// Returns the tuple element, or [`Resource::None`] if out of range.
    fn index(&self, index: usize) -> &Self::Output {
        self.at(index).unwrap_or(&NONE)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Record(record) => record.serialize(serializer),
            Self::Tuple(items) => serializer.collect_seq(items),
            Self::Value(value) => value.serialize(serializer),
            Self::None => serializer.serialize_unit(),
        }
    }
}

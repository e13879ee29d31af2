//! The resource tree model.
//!
//! One recursive representation is used from scanning to loading. A slot in
//! the tree is an [`Entry`]: a raw filesystem path, a nested [`Node`], a
//! loaded [`Value`], or [`Entry::Absent`]. Nodes are either ordered maps
//! ([`MapNode`]) or dense sequences ([`SeqNode`]).
//!
//! # Examples
//!
//! ```
//! use pathtyped_core::{Entry, MapNode, Node, SeqNode};
//! use std::path::PathBuf;
//!
//! let mut speech = SeqNode::with_len(2);
//! speech.set(1, Entry::Raw(PathBuf::from("speech_1.txt")));
//!
//! let mut root = MapNode::new();
//! root.insert("speech", Entry::Node(Node::Seq(speech)));
//!
//! assert_eq!(root.len(), 1);
//! assert!(root.get("speech").is_some_and(Entry::is_node));
//! ```

use crate::value::Value;
use std::path::{Path, PathBuf};

/// A slot in the resource tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A filesystem path, as produced by the scanner
    Raw(PathBuf),
    /// A nested map or sequence
    Node(Node),
    /// A value that has already been loaded
    Loaded(Value),
    /// No value: removed by a rule, or a gap in a grouped sequence
    Absent,
}

/// A structural tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Keyed mapping
    Map(MapNode),
    /// Indexed sequence
    Seq(SeqNode),
}

/// A leaf as offered to loaders.
///
/// Nodes and absent slots are never offered to loaders, so a `Leaf` is either
/// a raw path or an already-loaded value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leaf<'a> {
    /// A raw filesystem path
    Path(&'a Path),
    /// A value inserted before the loader stage
    Value(&'a Value),
}

impl Leaf<'_> {
    /// Returns the path, if this leaf is a raw path.
    #[must_use]
    pub const fn as_path(&self) -> Option<&Path> {
        match *self {
            Self::Path(p) => Some(p),
            Self::Value(_) => None,
        }
    }

    /// Converts the leaf into an owned value, unchanged.
    ///
    /// Raw paths become [`Value::Path`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Path(p) => Value::Path(p.to_path_buf()),
            Self::Value(v) => (*v).clone(),
        }
    }
}

impl Entry {
    /// Returns `true` if this entry is a nested node.
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    /// Returns `true` if this entry holds no value.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the nested node, if any.
    #[must_use]
    pub const fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the nested node mutably, if any.
    pub const fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the entry as a loader input, if it is a leaf with a value.
    #[must_use]
    pub fn as_leaf(&self) -> Option<Leaf<'_>> {
        match self {
            Self::Raw(path) => Some(Leaf::Path(path)),
            Self::Loaded(value) => Some(Leaf::Value(value)),
            Self::Node(_) | Self::Absent => None,
        }
    }
}

impl From<Node> for Entry {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<MapNode> for Entry {
    fn from(map: MapNode) -> Self {
        Self::Node(Node::Map(map))
    }
}

impl From<SeqNode> for Entry {
    fn from(seq: SeqNode) -> Self {
        Self::Node(Node::Seq(seq))
    }
}

impl Node {
    /// Returns the map, if this is a map node.
    #[must_use]
    pub const fn as_map(&self) -> Option<&MapNode> {
        match self {
            Self::Map(map) => Some(map),
            Self::Seq(_) => None,
        }
    }

    /// Returns the map mutably, if this is a map node.
    pub const fn as_map_mut(&mut self) -> Option<&mut MapNode> {
        match self {
            Self::Map(map) => Some(map),
            Self::Seq(_) => None,
        }
    }

    /// Returns the sequence, if this is a sequence node.
    #[must_use]
    pub const fn as_seq(&self) -> Option<&SeqNode> {
        match self {
            Self::Seq(seq) => Some(seq),
            Self::Map(_) => None,
        }
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Map(map) => map.len(),
            Self::Seq(seq) => seq.len(),
        }
    }

    /// Returns `true` if the node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered mapping from key to [`Entry`].
///
/// Keys are unique and iteration follows insertion order. Replacing the value
/// of an existing key keeps the key at its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapNode {
    entries: Vec<(String, Entry)>,
}

impl MapNode {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts an entry, returning the previous value for the key.
    ///
    /// A new key is appended. An existing key keeps its position and only its
    /// value is replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_core::{Entry, MapNode};
    ///
    /// let mut map = MapNode::new();
    /// map.insert("a", Entry::Absent);
    /// map.insert("b", Entry::Absent);
    /// let previous = map.insert("a", Entry::Loaded("x".into()));
    ///
    /// assert_eq!(previous, Some(Entry::Absent));
    /// assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) -> Option<Entry> {
        let key = key.into();
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, entry));
        }
        self.entries.push((key, entry));
        None
    }

    /// Returns the entry for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// Returns the entry for `key` mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, e)| e)
    }

    /// Removes `key`, returning its entry. Later keys shift up by one.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates over `(key, entry)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Iterates over `(key, entry)` pairs mutably, in order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Entry)> {
        self.entries.iter_mut().map(|(k, e)| (k.as_str(), e))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for MapNode {
    type Item = (String, Entry);
    type IntoIter = std::vec::IntoIter<(String, Entry)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Entry)> for MapNode {
    fn from_iter<I: IntoIterator<Item = (K, Entry)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, entry) in iter {
            map.insert(key, entry);
        }
        map
    }
}

/// Dense, 0-indexed sequence of [`Entry`] slots.
///
/// Unfilled slots hold [`Entry::Absent`], so a sequence never has holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeqNode {
    items: Vec<Entry>,
}

impl SeqNode {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a sequence of `len` absent slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            items: vec![Entry::Absent; len],
        }
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: Entry) {
        self.items.push(entry);
    }

    /// Stores `entry` at `index`, growing the sequence with absent slots if
    /// needed. Returns the previous entry.
    pub fn set(&mut self, index: usize, entry: Entry) -> Entry {
        if index >= self.items.len() {
            self.items.resize(index + 1, Entry::Absent);
        }
        std::mem::replace(&mut self.items[index], entry)
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.items.get(index)
    }

    /// Returns the entry at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.items.get_mut(index)
    }

    /// Iterates over entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.items.iter()
    }

    /// Iterates over entries mutably, in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry> {
        self.items.iter_mut()
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the sequence has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for SeqNode {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<Entry> for SeqNode {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

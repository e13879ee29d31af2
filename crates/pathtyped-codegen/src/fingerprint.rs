//! Content-addressed fingerprints of resource trees.
//!
//! The fingerprint captures everything the emitted declaration depends on:
//! map keys, path segments relative to the resource folder, the kinds of
//! values inserted before loading, the emitter, and the resolved type of
//! every leaf. File contents are not hashed, so editing a file without
//! changing its type leaves the fingerprint unchanged.
//!
//! # Examples
//!
//! ```
//! use pathtyped_codegen::Fingerprinter;
//! use pathtyped_core::{Entry, MapNode};
//!
//! let mut tree = MapNode::new();
//! tree.insert("main", Entry::Raw("res/main.txt".into()));
//!
//! let mut a = Fingerprinter::new("res");
//! a.fold_map(&tree);
//! let mut b = Fingerprinter::new("res");
//! b.fold_map(&tree);
//!
//! assert_eq!(a.finish(), b.finish());
//! assert_eq!(a.finish().as_str().len(), 64);
//! ```

use crate::shape::Shape;
use pathtyped_core::{Entry, MapNode, Node};
use std::fmt;
use std::path::{Path, PathBuf};

const SEPARATOR: &[u8] = &[0];

/// Lowercase hex digest of a resource tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `stored` (as read from an artifact) matches.
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        self.0 == stored
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Incremental fingerprint builder.
///
/// Tokens are folded in traversal order with a separator between them, so
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    hasher: blake3::Hasher,
    root: PathBuf,
}

impl Fingerprinter {
    /// Creates a builder for a tree scanned from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            hasher: blake3::Hasher::new(),
            root: root.into(),
        }
    }

    /// Folds one token.
    pub fn update(&mut self, token: &str) -> &mut Self {
        self.hasher.update(token.as_bytes());
        self.hasher.update(SEPARATOR);
        self
    }

    /// Folds a map node: all of its keys first, then each value in order.
    pub fn fold_map(&mut self, map: &MapNode) -> &mut Self {
        self.update("{");
        for key in map.keys() {
            self.update(key);
        }
        for (_, entry) in map.iter() {
            self.fold_entry(entry);
        }
        self.update("}")
    }

    /// Folds a single entry.
    pub fn fold_entry(&mut self, entry: &Entry) -> &mut Self {
        match entry {
            Entry::Node(Node::Map(map)) => self.fold_map(map),
            Entry::Node(Node::Seq(seq)) => {
                self.update("[");
                for item in seq.iter() {
                    self.fold_entry(item);
                }
                self.update("]")
            }
            Entry::Raw(path) => self.fold_path(path),
            Entry::Loaded(value) => self.update(value.kind().as_str()),
            Entry::Absent => self.update("absent"),
        }
    }

    /// Folds the resolved leaf types of a shape, in traversal order.
    pub fn fold_shape(&mut self, shape: &Shape) -> &mut Self {
        shape.for_each_leaf(&mut |kind| {
            self.update(kind.map_or("none", |k| k.as_str()));
        });
        self
    }

    /// Returns the digest of everything folded so far.
    #[must_use]
    pub fn finish(&self) -> Fingerprint {
        Fingerprint(self.hasher.finalize().to_hex().to_string())
    }

    fn fold_path(&mut self, path: &Path) -> &mut Self {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        for segment in relative.components() {
            let segment = segment.as_os_str().to_string_lossy();
            self.update(&segment);
        }
        self
    }
}

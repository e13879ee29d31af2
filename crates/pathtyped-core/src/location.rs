//! Diagnostic locations inside the resource tree.
//!
//! A [`Location`] addresses a node as a dotted/bracketed string such as
//! `root.tiles.grass[0][1]`. Locations are derived while walking the tree and
//! are never stored inside it.

use std::fmt;

/// Label used for the top of every tree.
pub const ROOT_LABEL: &str = "root";

/// A dotted/bracketed path to a node, used in logs and errors.
///
/// # Examples
///
/// ```
/// use pathtyped_core::Location;
///
/// let loc = Location::root().key("tiles").key("grass").index(0);
/// assert_eq!(loc.as_str(), "root.tiles.grass[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    /// Returns the location of the tree root.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_LABEL.to_string())
    }

    /// Returns the location of a map entry below this one.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}.{key}", self.0))
    }

    /// Returns the location of a sequence slot below this one.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns the location as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step of a parsed location path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A named field (`.name`)
    Field(&'a str),
    /// A sequence index (`[3]`)
    Index(usize),
}

/// Splits a path like `audio.bgm[2].title` into segments.
///
/// A leading `root` segment is accepted and skipped. Returns `None` when the
/// path is malformed (unbalanced brackets, non-numeric index, empty field).
///
/// # Examples
///
/// ```
/// use pathtyped_core::location::{parse_path, Segment};
///
/// let segments = parse_path("root.tiles.grass[1]").unwrap();
/// assert_eq!(
///     segments,
///     vec![Segment::Field("tiles"), Segment::Field("grass"), Segment::Index(1)]
/// );
/// assert!(parse_path("a[x]").is_none());
/// ```
#[must_use]
pub fn parse_path(path: &str) -> Option<Vec<Segment<'_>>> {
    let mut segments = Vec::new();

    for (position, part) in path.split('.').enumerate() {
        let (field, mut rest) = part.find('[').map_or((part, ""), |i| part.split_at(i));

        if field.is_empty() {
            // `[0]` directly after a dot or at the start is allowed, `a..b` is not
            if rest.is_empty() {
                return None;
            }
        } else if !(position == 0 && field == ROOT_LABEL) {
            segments.push(Segment::Field(field));
        }

        while !rest.is_empty() {
            let close = rest.find(']')?;
            let index = rest.get(1..close)?.parse().ok()?;
            segments.push(Segment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return None;
            }
        }
    }

    Some(segments)
}

//! Resource folder scanning.
//!
//! The scanner walks a resource folder and produces the initial tree: every
//! file becomes an [`Entry::Raw`] leaf and every directory a nested
//! [`MapNode`]. Children are ordered files first, then directories, each
//! sorted by name, so two scans of an unchanged folder are identical.
//!
//! # Examples
//!
//! ```
//! use pathtyped_files::Scanner;
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! # std::fs::create_dir(temp.path().join("audio")).unwrap();
//! # std::fs::write(temp.path().join("audio/jump.wav"), b"").unwrap();
//! # std::fs::write(temp.path().join("main.txt"), "hi").unwrap();
//! let scanner = Scanner::new("__.*__").unwrap();
//! let tree = scanner.scan(temp.path()).unwrap();
//!
//! assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["main.txt", "audio"]);
//! ```

use pathtyped_core::{Entry, Error, MapNode, Node, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Walks resource folders into [`MapNode`] trees.
#[derive(Debug, Clone)]
pub struct Scanner {
    ignore: Option<Regex>,
}

impl Scanner {
    /// Creates a scanner that skips basenames fully matching `ignore`.
    ///
    /// An empty pattern disables ignoring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `ignore` is not a valid regex.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathtyped_files::Scanner;
    ///
    /// assert!(Scanner::new("__.*__").is_ok());
    /// assert!(Scanner::new("(").unwrap_err().is_invalid_pattern());
    /// ```
    pub fn new(ignore: &str) -> Result<Self> {
        if ignore.is_empty() {
            return Ok(Self { ignore: None });
        }

        let regex = Regex::new(&format!("^(?:{ignore})$")).map_err(|e| Error::InvalidPattern {
            pattern: ignore.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            ignore: Some(regex),
        })
    }

    /// Returns `true` if `name` is skipped by this scanner.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.as_ref().is_some_and(|re| re.is_match(name))
    }

    /// Scans `root` into a tree of raw paths.
    ///
    /// Symbolic links are followed. Ignored directories are not descended.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `root`, or a directory below it, does not exist
    /// - [`Error::NotADirectory`] if `root` is not a directory
    /// - [`Error::Io`] for any other filesystem failure, including link loops
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<MapNode> {
        let root = root.as_ref();
        debug!("Scanning resource folder {}", root.display());

        let metadata = fs::metadata(root).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::NotFound {
                    path: root.display().to_string(),
                }
            } else {
                Error::io(root, e)
            }
        })?;

        if !metadata.is_dir() {
            return Err(Error::NotADirectory {
                path: root.display().to_string(),
            });
        }

        let mut tree = MapNode::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(|entry| !self.is_ignored(&entry.file_name().to_string_lossy()));

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(root, e))?;
            let relative = entry.path().strip_prefix(root).map_err(|_| Error::InvalidTree {
                location: entry.path().display().to_string(),
                reason: format!("path is outside of {}", root.display()),
            })?;

            let parent = parent_map(&mut tree, relative).ok_or_else(|| Error::InvalidTree {
                location: relative.display().to_string(),
                reason: "parent directory missing from scan".to_string(),
            })?;
            let key = entry.file_name().to_string_lossy().into_owned();

            if entry.file_type().is_dir() {
                debug!("Traversing {}", entry.path().display());
                parent.insert(key, Entry::from(MapNode::new()));
            } else {
                debug!("{} has been added to the tree", entry.path().display());
                parent.insert(key, Entry::Raw(entry.into_path()));
            }
        }

        Ok(tree)
    }
}

/// Orders files before directories, then by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Finds the map that holds `relative`'s last component.
fn parent_map<'a>(tree: &'a mut MapNode, relative: &Path) -> Option<&'a mut MapNode> {
    let mut current = tree;
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            let name = component.as_os_str().to_string_lossy();
            current = current
                .get_mut(&name)
                .and_then(Entry::as_node_mut)
                .and_then(Node::as_map_mut)?;
        }
    }
    Some(current)
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();

    if let Some(ancestor) = err.loop_ancestor() {
        return Error::io(
            &path,
            io::Error::other(format!("symbolic link loop back to {}", ancestor.display())),
        );
    }

    match err.into_io_error() {
        Some(e) if e.kind() == io::ErrorKind::NotFound => Error::NotFound {
            path: path.display().to_string(),
        },
        Some(e) => Error::io(&path, e),
        None => Error::io(&path, io::Error::other("directory walk failed")),
    }
}

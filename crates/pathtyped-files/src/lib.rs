//! Filesystem access for pathtyped.
//!
//! This crate owns every interaction with the disk: walking the resource
//! folder into the initial tree, and reading and writing the generated
//! declaration artifact.
//!
//! # Features
//!
//! - **Deterministic scans**: files before directories, each sorted by name
//! - **Ignore patterns**: full-match regex tested against every basename
//! - **Atomic writes**: artifacts are written to a temp file and renamed
//!
//! # Examples
//!
//! ```
//! use pathtyped_files::{DefinitionFile, Scanner};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! # std::fs::write(temp.path().join("data.txt"), "data").unwrap();
//! let tree = Scanner::new("__.*__").unwrap().scan(temp.path()).unwrap();
//! assert!(tree.contains_key("data.txt"));
//!
//! let definition = DefinitionFile::new("", temp.path().join("definition.py"));
//! assert_eq!(definition.read_integrity().unwrap(), "");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod definition;
mod scanner;

pub use definition::DefinitionFile;
pub use scanner::Scanner;

//! Core types and errors for pathtyped.
//!
//! This crate provides the foundational types shared by every other crate in
//! the pathtyped workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - The resource tree model (`Entry`, `MapNode`, `SeqNode`, `Leaf`)
//! - Loaded values and their stable kinds (`Value`, `ValueKind`)
//! - The resolved, read-only result tree (`Resource`)
//! - Location paths used in diagnostics (`Location`)
//! - Error hierarchy with contextual information
//! - Construction configuration and optional log output
//!
//! # Examples
//!
//! ```
//! use pathtyped_core::{Entry, Location, MapNode, ResourceConfig};
//! use std::path::PathBuf;
//!
//! let config = ResourceConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let mut root = MapNode::new();
//! root.insert("data.txt", Entry::Raw(PathBuf::from("data.txt")));
//! assert_eq!(Location::root().key("data").to_string(), "root.data");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod resource;
mod tree;
mod value;

pub mod location;
pub mod logging;

pub use config::{CollisionPolicy, ResourceConfig, ResourceConfigBuilder};
pub use error::{BoxError, Error, Result};
pub use location::Location;
pub use resource::{Record, Resource};
pub use tree::{Entry, Leaf, MapNode, Node, SeqNode};
pub use value::{Value, ValueKind};

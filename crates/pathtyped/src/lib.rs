//! Typed, read-only access to resource folders.
//!
//! pathtyped scans a resource folder into a tree, rewrites it with ordered
//! rules, loads every file through ordered loaders, and exposes the result as
//! a [`Resource`] tree. Alongside, it emits a declaration artifact describing
//! that tree for an editor or compiler, and only rewrites the artifact when
//! the folder contents, loaders or emitter change.
//!
//! # Pipeline
//!
//! - [`Scanner`] turns the folder into a raw tree, one leaf per file
//! - [`Middleware`] rules rewrite the tree ([`strip_extensions`], [`group_by`])
//! - [`NormalizeNames`] turns every key into an identifier
//! - [`Loader`]s turn leaves into values ([`Loaders`], [`path_loader`])
//! - [`Emitter`]s describe the result for Python, TypeScript or Rust
//!
//! # Examples
//!
//! ```
//! use pathtyped::{DefinitionFile, Loaders, ResourceManager, group_by, strip_extensions};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! # let folder = temp.path().join("res");
//! # std::fs::create_dir(&folder).unwrap();
//! # for (name, text) in [("data", "d"), ("main", "m"), ("speech_1", "s1"), ("speech_2", "s2")] {
//! #     std::fs::write(folder.join(format!("{name}.txt")), text).unwrap();
//! # }
//! let definition = DefinitionFile::new("from defaults import *", temp.path().join("definition.py"));
//!
//! let manager = ResourceManager::builder(&folder, definition)
//!     .middleware(strip_extensions("txt|json")?)
//!     .middleware(group_by(r"(speech)_(\d)")?)
//!     .loader(Loaders::text())
//!     .build()?;
//!
//! let root = manager.root();
//! assert_eq!(root.field_names(), vec!["speech", "data", "main"]);
//! assert_eq!(root["data"].as_text(), Some("d"));
//! assert!(root["speech"][0].is_none());
//! assert_eq!(root.lookup("speech[2]").and_then(|r| r.as_text()), Some("s2"));
//!
//! assert!(manager.declaration().contains("from defaults import *"));
//! # Ok::<(), pathtyped::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod context;
mod loader;
mod manager;
mod middleware;
mod normalize;
mod resolve;
mod rules;

pub use context::Context;
pub use loader::{
    BytesLoader, FnLoader, JsonLoader, LoadResult, Loader, LoaderExt, Loaders, PathFnLoader,
    PathValueLoader, TextLoader, WithExtension, WithFallback, load_leaf, loader_fn, path_loader,
};
pub use manager::{DefinitionStatus, ResourceManager, ResourceManagerBuilder};
pub use middleware::{FnMiddleware, Middleware, apply_middleware, middleware_fn, run_middlewares};
pub use normalize::{NormalizeNames, normalize_identifier};
pub use resolve::resolve;
pub use rules::{GroupBy, StripExtensions, group_by, strip_extensions};

pub use pathtyped_codegen::{
    Emitter, EmitterKind, Fingerprint, PythonEmitter, RustEmitter, Shape, TypeScriptEmitter,
};
pub use pathtyped_core::{
    CollisionPolicy, Entry, Error, Leaf, Location, MapNode, Node, Record, Resource,
    ResourceConfig, ResourceConfigBuilder, Result, SeqNode, Value, ValueKind,
};
pub use pathtyped_files::{DefinitionFile, Scanner};

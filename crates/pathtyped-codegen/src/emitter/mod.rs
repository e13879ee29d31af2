//! Declaration emitters.
//!
//! An [`Emitter`] renders a root [`Shape`] into the declaration body for one
//! target ecosystem. The artifact header (fingerprint line, notice, prelude,
//! import statement) is assembled by the
//! [`TemplateEngine`](crate::TemplateEngine) around that body.
//!
//! # Examples
//!
//! ```
//! use pathtyped_codegen::{EmitterKind, Field, Shape};
//! use pathtyped_core::ValueKind;
//!
//! let shape = Shape::record("root", vec![Field::new("main", Shape::Scalar(ValueKind::Text))]);
//! let emitter = EmitterKind::Python.emitter();
//!
//! let body = emitter.emit(&shape, "    ").unwrap();
//! assert!(body.contains("(\"main\", str),"));
//! ```

mod python;
mod rust;
mod typescript;

pub use python::PythonEmitter;
pub use rust::RustEmitter;
pub use typescript::TypeScriptEmitter;

use crate::shape::{Field, Shape};
use pathtyped_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Renders shapes into declarations for one target language.
pub trait Emitter: fmt::Debug + Send + Sync {
    /// Stable emitter name, folded into the fingerprint.
    fn name(&self) -> &'static str;

    /// Line comment marker of the target language.
    fn comment_prefix(&self) -> &'static str;

    /// Lines placed ahead of the import statement.
    fn prelude(&self) -> &'static str;

    /// Conventional file extension of the artifact, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Renders the declaration body for a root record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTree`] if `shape` is not a record.
    fn emit(&self, shape: &Shape, indent: &str) -> Result<String>;
}

/// Built-in emitters, selectable by name.
///
/// # Examples
///
/// ```
/// use pathtyped_codegen::EmitterKind;
///
/// let kind: EmitterKind = "typescript".parse().unwrap();
/// assert_eq!(kind, EmitterKind::TypeScript);
/// assert_eq!(kind.emitter().comment_prefix(), "//");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitterKind {
    /// `typing.NamedTuple` declarations
    #[default]
    Python,
    /// Exported TypeScript interface
    TypeScript,
    /// `serde::Deserialize` structs
    Rust,
}

impl EmitterKind {
    /// Creates the emitter.
    #[must_use]
    pub fn emitter(self) -> Box<dyn Emitter> {
        match self {
            Self::Python => Box::new(PythonEmitter),
            Self::TypeScript => Box::new(TypeScriptEmitter),
            Self::Rust => Box::new(RustEmitter),
        }
    }

    /// Returns the emitter name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::Rust => "rust",
        }
    }
}

impl fmt::Display for EmitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmitterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "rust" | "rs" => Ok(Self::Rust),
            _ => Err(Error::ConfigError {
                message: format!("unknown emitter '{s}' (expected python, typescript or rust)"),
            }),
        }
    }
}

/// Maps a formatting failure while writing a declaration body.
fn write_error(e: fmt::Error) -> Error {
    Error::SerializationError {
        message: format!("failed to write declaration: {e}"),
        source: None,
    }
}

/// Returns the fields of a root record, or an error for any other shape.
fn root_fields(shape: &Shape) -> Result<&[Field]> {
    match shape {
        Shape::Record { fields, .. } => Ok(fields),
        _ => Err(Error::InvalidTree {
            location: pathtyped_core::location::ROOT_LABEL.to_string(),
            reason: "declaration root must be a record".to_string(),
        }),
    }
}

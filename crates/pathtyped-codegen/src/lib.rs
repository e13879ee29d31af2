//! Fingerprinting and declaration generation for pathtyped.
//!
//! Turns a resolved resource tree into a declaration artifact:
//!
//! - [`Fingerprinter`] folds the tree into a content-addressed [`Fingerprint`]
//! - [`Shape`] describes the resolved tree independently of any language
//! - [`Emitter`] implementations render shapes for Python, TypeScript or Rust
//! - [`TemplateEngine`] wraps the rendered body with the artifact header
//!
//! # Examples
//!
//! ```
//! use pathtyped_codegen::{EmitterKind, Field, Shape};
//! use pathtyped_core::ValueKind;
//!
//! let shape = Shape::record("root", vec![Field::new("data", Shape::Scalar(ValueKind::Text))]);
//! let body = EmitterKind::TypeScript.emitter().emit(&shape, "  ").unwrap();
//!
//! assert_eq!(body, "export interface Root {\n  data: string;\n}\n");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod emitter;
mod fingerprint;
mod shape;
mod template_engine;

pub use emitter::{Emitter, EmitterKind, PythonEmitter, RustEmitter, TypeScriptEmitter};
pub use fingerprint::{Fingerprint, Fingerprinter};
pub use shape::{Field, Shape};
pub use template_engine::{DeclarationHeader, TemplateEngine};

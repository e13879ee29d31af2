//! Declaration artifact rendering using Handlebars.
//!
//! The emitter produces the declaration body; the template engine wraps it
//! with the artifact header: the fingerprint line, the generation notice,
//! the emitter prelude and the caller's import statement.
//!
//! # Examples
//!
//! ```
//! use pathtyped_codegen::{DeclarationHeader, EmitterKind, Field, Fingerprinter, Shape, TemplateEngine};
//! use pathtyped_core::ValueKind;
//!
//! let engine = TemplateEngine::new().unwrap();
//! let shape = Shape::record("root", vec![Field::new("main", Shape::Scalar(ValueKind::Text))]);
//! let fingerprint = Fingerprinter::new("res").finish();
//! let header = DeclarationHeader::new(&fingerprint, "ResourceManager", "from defaults import *");
//!
//! let artifact = engine
//!     .render_declaration(EmitterKind::Python.emitter().as_ref(), &shape, "    ", &header)
//!     .unwrap();
//!
//! assert!(artifact.starts_with(&format!("# {fingerprint}\n")));
//! assert!(artifact.contains("from defaults import *\n"));
//! ```

use crate::emitter::Emitter;
use crate::fingerprint::Fingerprint;
use crate::shape::Shape;
use chrono::{DateTime, Local};
use handlebars::Handlebars;
use pathtyped_core::{Error, Result};
use serde::Serialize;

const DECLARATION_TEMPLATE: &str = "declaration";

/// Header fields of one artifact.
#[derive(Debug, Clone)]
pub struct DeclarationHeader<'a> {
    /// Fingerprint written on the first line
    pub fingerprint: &'a Fingerprint,
    /// Label of the resource manager that generated the artifact
    pub name: &'a str,
    /// Import statement copied verbatim ahead of the body
    pub import_statement: &'a str,
    /// Generation time shown in the notice
    pub generated_at: DateTime<Local>,
}

impl<'a> DeclarationHeader<'a> {
    /// Creates a header stamped with the current local time.
    #[must_use]
    pub fn new(fingerprint: &'a Fingerprint, name: &'a str, import_statement: &'a str) -> Self {
        Self {
            fingerprint,
            name,
            import_statement,
            generated_at: Local::now(),
        }
    }
}

#[derive(Serialize)]
struct DeclarationContext<'a> {
    comment: &'a str,
    fingerprint: &'a str,
    name: &'a str,
    generated_at: String,
    prelude: &'a str,
    import_statement: &'a str,
    body: &'a str,
}

/// Template engine for declaration artifacts.
///
/// Wraps Handlebars with the artifact template pre-registered. Escaping is
/// disabled since the output is source code, not HTML.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a new template engine with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if template registration fails.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string(
                DECLARATION_TEMPLATE,
                include_str!("../templates/declaration.hbs"),
            )
            .map_err(|e| Error::SerializationError {
                message: format!("Failed to register declaration template: {e}"),
                source: None,
            })?;

        Ok(Self { handlebars })
    }

    /// Renders a registered template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if the template is unknown, a
    /// variable is missing, or rendering fails.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::SerializationError {
                message: format!("Template rendering failed: {e}"),
                source: None,
            })
    }

    /// Renders the complete artifact for `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if the emitter rejects the shape or rendering fails.
    pub fn render_declaration(
        &self,
        emitter: &dyn Emitter,
        shape: &Shape,
        indent: &str,
        header: &DeclarationHeader<'_>,
    ) -> Result<String> {
        let body = emitter.emit(shape, indent)?;
        let context = DeclarationContext {
            comment: emitter.comment_prefix(),
            fingerprint: header.fingerprint.as_str(),
            name: header.name,
            generated_at: header.generated_at.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            prelude: emitter.prelude(),
            import_statement: header.import_statement,
            body: body.trim_end(),
        };

        self.render(DECLARATION_TEMPLATE, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{EmitterKind, PythonEmitter};
    use crate::fingerprint::Fingerprinter;
    use crate::shape::Field;
    use chrono::TimeZone;
    use pathtyped_core::ValueKind;

    fn shape() -> Shape {
        Shape::record(
            "root",
            vec![
                Field::new("data", Shape::Scalar(ValueKind::Text)),
                Field::new("main", Shape::Scalar(ValueKind::Text)),
            ],
        )
    }

    #[test]
    fn test_template_engine_creation() {
        assert!(TemplateEngine::new().is_ok());
    }

    #[test]
    fn test_python_artifact_layout() {
        let engine = TemplateEngine::new().unwrap();
        let fingerprint = Fingerprinter::new("res").finish();
        let header = DeclarationHeader {
            fingerprint: &fingerprint,
            name: "ResourceManager",
            import_statement: "from defaults import *",
            generated_at: Local.with_ymd_and_hms(2023, 1, 16, 0, 54, 46).unwrap(),
        };

        let artifact = engine
            .render_declaration(&PythonEmitter, &shape(), "  ", &header)
            .unwrap();

        let expected = format!(
            "\
# {fingerprint}
# Automatically generated by ResourceManager at: 2023-01-16 00:54:46.000000
# DO NOT EDIT THIS FILE MANUALLY.
# If you want to regenerate this file, change the integrity hash in the first line to something else

# Some generic fixes
from pathlib import Path
list = list[object]
dict = dict[object, object]

# Default import statement:
from defaults import *
# Main content:
from typing import NamedTuple

root = NamedTuple(\"root\", [
  (\"data\", str),
  (\"main\", str),
])
"
        );
        assert_eq!(artifact, expected);
    }

    #[test]
    fn test_comment_prefix_follows_emitter() {
        let engine = TemplateEngine::new().unwrap();
        let fingerprint = Fingerprinter::new("res").finish();
        let header = DeclarationHeader::new(&fingerprint, "Assets", "import type {} from './x';");

        for kind in [EmitterKind::TypeScript, EmitterKind::Rust] {
            let artifact = engine
                .render_declaration(kind.emitter().as_ref(), &shape(), "  ", &header)
                .unwrap();
            assert!(artifact.starts_with(&format!("// {fingerprint}\n")));
            assert!(artifact.contains("// Automatically generated by Assets at: "));
            assert!(artifact.contains("import type {} from './x';\n"));
            assert!(artifact.ends_with("}\n"));
        }
    }

    #[test]
    fn test_no_html_escaping() {
        let engine = TemplateEngine::new().unwrap();
        let fingerprint = Fingerprinter::new("res").finish();
        let header = DeclarationHeader::new(&fingerprint, "<Assets>", "use a::{b, c};");
        let artifact = engine
            .render_declaration(&PythonEmitter, &shape(), "  ", &header)
            .unwrap();
        assert!(artifact.contains("by <Assets> at"));
        assert!(artifact.contains("use a::{b, c};"));
    }

    #[test]
    fn test_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render("missing", &serde_json::json!({})).unwrap_err();
        assert!(err.is_serialization_error());
    }
}

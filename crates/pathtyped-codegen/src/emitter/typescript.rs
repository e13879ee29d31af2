//! TypeScript interface declarations.
//!
//! The root record becomes `export interface Root`, nested records become
//! inline object types and sequences become tuple types.

use super::{Emitter, root_fields, write_error};
use crate::shape::{Field, Shape};
use pathtyped_core::{Result, ValueKind};
use std::fmt::{self, Write as _};

/// Emits a TypeScript `interface` describing the resource tree.
///
/// # Examples
///
/// ```
/// use pathtyped_codegen::{Emitter, Field, Shape, TypeScriptEmitter};
/// use pathtyped_core::ValueKind;
///
/// let shape = Shape::record(
///     "root",
///     vec![Field::new("speech", Shape::Tuple(vec![Shape::None, Shape::Scalar(ValueKind::Text)]))],
/// );
/// let body = TypeScriptEmitter.emit(&shape, "  ").unwrap();
///
/// assert_eq!(body, "export interface Root {\n  speech: [null, string];\n}\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptEmitter;

impl Emitter for TypeScriptEmitter {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    fn prelude(&self) -> &'static str {
        "export type Bytes = Uint8Array;\nexport type FilePath = string;"
    }

    fn file_extension(&self) -> &'static str {
        "ts"
    }

    fn emit(&self, shape: &Shape, indent: &str) -> Result<String> {
        let fields = root_fields(shape)?;
        let mut out = String::from("export interface Root ");
        write_object(&mut out, fields, "", indent).map_err(write_error)?;
        out.push('\n');
        Ok(out)
    }
}

/// TypeScript name of a leaf type.
const fn type_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Text => "string",
        ValueKind::Bytes => "Bytes",
        ValueKind::Path => "FilePath",
        ValueKind::Integer | ValueKind::Float => "number",
        ValueKind::Bool => "boolean",
        ValueKind::Map => "Record<string, unknown>",
        ValueKind::List => "unknown[]",
        ValueKind::Null => "null",
    }
}

fn write_object(out: &mut String, fields: &[Field], current: &str, unit: &str) -> fmt::Result {
    let deeper = format!("{current}{unit}");
    out.push_str("{\n");
    for field in fields {
        write!(out, "{deeper}{}: ", field.name)?;
        write_type(out, &field.shape, &deeper, unit)?;
        out.push_str(";\n");
    }
    write!(out, "{current}}}")
}

fn write_type(out: &mut String, shape: &Shape, current: &str, unit: &str) -> fmt::Result {
    match shape {
        Shape::Record { fields, .. } => write_object(out, fields, current, unit)?,
        Shape::Tuple(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_type(out, item, current, unit)?;
            }
            out.push(']');
        }
        Shape::Scalar(kind) => out.push_str(type_name(*kind)),
        Shape::None => out.push_str("null"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_records() {
        let shape = Shape::record(
            "root",
            vec![
                Field::new(
                    "audio",
                    Shape::record(
                        "audio",
                        vec![Field::new("jump", Shape::Scalar(ValueKind::Bytes))],
                    ),
                ),
                Field::new("count", Shape::Scalar(ValueKind::Integer)),
            ],
        );

        let expected = "\
export interface Root {
  audio: {
    jump: Bytes;
  };
  count: number;
}
";
        assert_eq!(TypeScriptEmitter.emit(&shape, "  ").unwrap(), expected);
    }

    #[test]
    fn test_records_inside_tuples() {
        let shape = Shape::record(
            "root",
            vec![Field::new(
                "levels",
                Shape::Tuple(vec![
                    Shape::record("0", vec![Field::new("flag", Shape::Scalar(ValueKind::Bool))]),
                    Shape::Tuple(vec![]),
                ]),
            )],
        );

        let expected = "\
export interface Root {
  levels: [{
    flag: boolean;
  }, []];
}
";
        assert_eq!(TypeScriptEmitter.emit(&shape, "  ").unwrap(), expected);
    }

    #[test]
    fn test_path_and_json_types() {
        assert_eq!(type_name(ValueKind::Path), "FilePath");
        assert_eq!(type_name(ValueKind::Map), "Record<string, unknown>");
        assert_eq!(type_name(ValueKind::List), "unknown[]");
        assert_eq!(type_name(ValueKind::Float), "number");
    }
}

//! `typing.NamedTuple` declarations.
//!
//! Records become inline `NamedTuple("name", [...])` calls and tuples become
//! `tuple[...]` subscriptions. The root is bound to the name `root`, so the
//! calling code can annotate its resource handle with it.

use super::{Emitter, root_fields, write_error};
use crate::shape::{Field, Shape};
use pathtyped_core::{Result, ValueKind};
use std::fmt::{self, Write as _};

/// Emits Python `NamedTuple` declarations.
///
/// # Examples
///
/// ```
/// use pathtyped_codegen::{Emitter, Field, PythonEmitter, Shape};
/// use pathtyped_core::ValueKind;
///
/// let shape = Shape::record("root", vec![Field::new("script", Shape::Scalar(ValueKind::Text))]);
/// let body = PythonEmitter.emit(&shape, "  ").unwrap();
///
/// assert_eq!(
///     body,
///     "from typing import NamedTuple\n\nroot = NamedTuple(\"root\", [\n  (\"script\", str),\n])\n"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonEmitter;

impl Emitter for PythonEmitter {
    fn name(&self) -> &'static str {
        "python"
    }

    fn comment_prefix(&self) -> &'static str {
        "#"
    }

    fn prelude(&self) -> &'static str {
        "from pathlib import Path\nlist = list[object]\ndict = dict[object, object]"
    }

    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn emit(&self, shape: &Shape, indent: &str) -> Result<String> {
        let fields = root_fields(shape)?;
        let mut out = String::from("from typing import NamedTuple\n\nroot = NamedTuple(\"root\", [\n");
        write_fields(&mut out, fields, indent, indent).map_err(write_error)?;
        out.push_str("])\n");
        Ok(out)
    }
}

/// Python name of a leaf type.
const fn type_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Text => "str",
        ValueKind::Bytes => "bytes",
        ValueKind::Path => "Path",
        ValueKind::Integer => "int",
        ValueKind::Float => "float",
        ValueKind::Bool => "bool",
        ValueKind::Map => "dict",
        ValueKind::List => "list",
        ValueKind::Null => "None",
    }
}

fn write_fields(out: &mut String, fields: &[Field], current: &str, unit: &str) -> fmt::Result {
    let deeper = format!("{current}{unit}");
    for field in fields {
        let name = &field.name;
        write!(out, "{current}(\"{name}\", ")?;
        match &field.shape {
            Shape::Record { fields, .. } => {
                writeln!(out, "NamedTuple(\"{name}\", [")?;
                write_fields(out, fields, &deeper, unit)?;
                write!(out, "{current}])")?;
            }
            Shape::Tuple(items) if items.is_empty() => out.push_str("tuple[()]"),
            Shape::Tuple(items) => {
                out.push_str("tuple[\n");
                write_items(out, items, &deeper, unit)?;
                write!(out, "{current}],")?;
            }
            Shape::Scalar(kind) => out.push_str(type_name(*kind)),
            Shape::None => out.push_str("None"),
        }
        out.push_str("),\n");
    }
    Ok(())
}

fn write_items(out: &mut String, items: &[Shape], current: &str, unit: &str) -> fmt::Result {
    let deeper = format!("{current}{unit}");
    for (index, item) in items.iter().enumerate() {
        match item {
            Shape::Record { fields, .. } => {
                writeln!(out, "{current}NamedTuple(\"{index}\", [")?;
                write_fields(out, fields, &deeper, unit)?;
                write!(out, "{current}])")?;
            }
            Shape::Tuple(inner) if inner.is_empty() => {
                write!(out, "{current}tuple[()]")?;
            }
            Shape::Tuple(inner) => {
                writeln!(out, "{current}tuple[")?;
                write_items(out, inner, &deeper, unit)?;
                write!(out, "{current}]")?;
            }
            Shape::Scalar(kind) => {
                write!(out, "{current}{}", type_name(*kind))?;
            }
            Shape::None => {
                write!(out, "{current}None")?;
            }
        }
        out.push_str(",\n");
    }
    Ok(())
}

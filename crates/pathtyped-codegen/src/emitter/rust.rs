//! `serde::Deserialize` struct declarations.
//!
//! The root record becomes `pub struct Root`. Every nested record gets its own
//! struct, named by joining the PascalCase field path (`tiles.grass` becomes
//! `TilesGrass`), and sequences become tuples. Sequences longer than twelve
//! slots become `Vec<T>` when every slot has the same type, or a struct with
//! `index_N` fields otherwise. The generated structs accept the output of
//! `Resource::deserialize`.

use super::{Emitter, root_fields, write_error};
use crate::shape::{Field, Shape};
use pathtyped_core::{Result, ValueKind};
use std::collections::HashSet;
use std::fmt::{self, Write as _};

/// Identifiers that need the raw `r#` prefix to be used as field names.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Identifiers that cannot be raw and are renamed with a trailing underscore.
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Emits Rust structs deriving `serde::Deserialize`.
///
/// # Examples
///
/// ```
/// use pathtyped_codegen::{Emitter, Field, RustEmitter, Shape};
/// use pathtyped_core::ValueKind;
///
/// let shape = Shape::record("root", vec![Field::new("main", Shape::Scalar(ValueKind::Text))]);
/// let body = RustEmitter.emit(&shape, "    ").unwrap();
///
/// assert!(body.contains("pub struct Root {"));
/// assert!(body.contains("    pub main: String,"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RustEmitter;

impl Emitter for RustEmitter {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    fn prelude(&self) -> &'static str {
        "use serde::Deserialize;\nuse std::path::PathBuf;"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn emit(&self, shape: &Shape, indent: &str) -> Result<String> {
        let fields = root_fields(shape)?;
        let mut writer = StructWriter {
            indent,
            used: HashSet::from(["Root".to_string()]),
        };
        writer.record("Root", fields).map_err(write_error)
    }
}

/// Rust name of a leaf type.
const fn type_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Text => "String",
        ValueKind::Bytes => "Vec<u8>",
        ValueKind::Path => "PathBuf",
        ValueKind::Integer => "i64",
        ValueKind::Float => "f64",
        ValueKind::Bool => "bool",
        ValueKind::Map => "serde_json::Map<String, serde_json::Value>",
        ValueKind::List => "Vec<serde_json::Value>",
        ValueKind::Null => "()",
    }
}

/// Converts `snake_case` (or any identifier) into `PascalCase`.
///
/// ```text
/// tiles      -> Tiles
/// big_chest  -> BigChest
/// index_1    -> Index1
/// ```
fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect()
}

/// Returns the field identifier and the serde rename it needs, if any.
fn field_ident(name: &str) -> (String, Option<&str>) {
    if RESERVED.contains(&name) {
        (format!("{name}_"), Some(name))
    } else if RAW_KEYWORDS.contains(&name) {
        (format!("r#{name}"), None)
    } else {
        (name.to_string(), None)
    }
}

type WriteResult<T> = std::result::Result<T, fmt::Error>;

/// Longest tuple that still derives `Debug` and `Clone`.
const MAX_TUPLE_LEN: usize = 12;

struct StructWriter<'a> {
    indent: &'a str,
    used: HashSet<String>,
}

impl StructWriter<'_> {
    /// Reserves a struct name, appending a counter on clashes.
    fn unique(&mut self, hint: &str) -> String {
        let base = if hint.is_empty() { "Record" } else { hint };
        let mut name = base.to_string();
        let mut counter = 2;
        while !self.used.insert(name.clone()) {
            name = format!("{base}{counter}");
            counter += 1;
        }
        name
    }

    /// Renders one struct followed by every struct it depends on.
    fn record(&mut self, type_name: &str, fields: &[Field]) -> WriteResult<String> {
        let indent = self.indent;
        let mut nested = Vec::new();
        let mut body = String::new();
        let mut needs_allow = false;

        for field in fields {
            let hint = format!("{type_name}{}", to_pascal_case(&field.name));
            let ty = self.type_of(&field.shape, &hint, &mut nested)?;
            let (ident, rename) = field_ident(&field.name);
            needs_allow |= field.name.chars().any(|c| c.is_ascii_uppercase());

            if let Some(rename) = rename {
                writeln!(body, "{indent}#[serde(rename = \"{rename}\")]")?;
            }
            writeln!(body, "{indent}pub {ident}: {ty},")?;
        }

        let mut out = String::from("#[derive(Debug, Clone, Deserialize)]\n");
        if needs_allow {
            out.push_str("#[allow(non_snake_case)]\n");
        }
        writeln!(out, "pub struct {type_name} {{")?;
        out.push_str(&body);
        out.push_str("}\n");

        for definition in nested {
            out.push('\n');
            out.push_str(&definition);
        }
        Ok(out)
    }

    /// Renders a struct with one `index_N` field per sequence slot.
    ///
    /// Derived structs also deserialize from sequences, so the fields are
    /// filled in slot order.
    fn indexed(&mut self, hint: &str, types: &[String]) -> WriteResult<(String, String)> {
        let indent = self.indent;
        let name = self.unique(hint);
        let mut out = String::from("#[derive(Debug, Clone, Deserialize)]\n");
        writeln!(out, "pub struct {name} {{")?;
        for (index, ty) in types.iter().enumerate() {
            writeln!(out, "{indent}pub index_{index}: {ty},")?;
        }
        out.push_str("}\n");
        Ok((name, out))
    }

    fn type_of(
        &mut self,
        shape: &Shape,
        hint: &str,
        nested: &mut Vec<String>,
    ) -> WriteResult<String> {
        let ty = match shape {
            Shape::Record { fields, .. } => {
                let name = self.unique(hint);
                let definition = self.record(&name, fields)?;
                nested.push(definition);
                name
            }
            Shape::Tuple(items) => {
                let mut types = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    types.push(self.type_of(item, &format!("{hint}{index}"), nested)?);
                }
                match types.as_slice() {
                    [] => "[(); 0]".to_string(),
                    [single] => format!("({single},)"),
                    short if short.len() <= MAX_TUPLE_LEN => format!("({})", short.join(", ")),
                    [first, rest @ ..] if rest.iter().all(|ty| ty == first) => {
                        format!("Vec<{first}>")
                    }
                    mixed => {
                        let (name, definition) = self.indexed(hint, mixed)?;
                        nested.push(definition);
                        name
                    }
                }
            }
            Shape::Scalar(kind) => type_name(*kind).to_string(),
            Shape::None => "()".to_string(),
        };
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("tiles"), "Tiles");
        assert_eq!(to_pascal_case("big_chest"), "BigChest");
        assert_eq!(to_pascal_case("index_1"), "Index1");
        assert_eq!(to_pascal_case("_"), "");
    }

    #[test]
    fn test_field_idents() {
        assert_eq!(field_ident("main"), ("main".to_string(), None));
        assert_eq!(field_ident("type"), ("r#type".to_string(), None));
        assert_eq!(field_ident("self"), ("self_".to_string(), Some("self")));
        assert_eq!(field_ident("_"), ("__".to_string(), Some("_")));
    }

    #[test]
    fn test_nested_structs() {
        let shape = Shape::record(
            "root",
            vec![
                Field::new("data", Shape::Scalar(ValueKind::Text)),
                Field::new(
                    "speech",
                    Shape::Tuple(vec![Shape::None, Shape::Scalar(ValueKind::Text)]),
                ),
                Field::new(
                    "tiles",
                    Shape::record(
                        "tiles",
                        vec![Field::new(
                            "grass",
                            Shape::Tuple(vec![Shape::Scalar(ValueKind::Bytes)]),
                        )],
                    ),
                ),
            ],
        );

        let expected = "\
#[derive(Debug, Clone, Deserialize)]
pub struct Root {
    pub data: String,
    pub speech: ((), String),
    pub tiles: RootTiles,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RootTiles {
    pub grass: (Vec<u8>,),
}
";
        assert_eq!(RustEmitter.emit(&shape, "    ").unwrap(), expected);
    }

    #[test]
    fn test_struct_name_clash() {
        let shape = Shape::record(
            "root",
            vec![
                Field::new("a_b", Shape::record("a_b", vec![])),
                Field::new("aB", Shape::record("aB", vec![])),
            ],
        );
        let body = RustEmitter.emit(&shape, "  ").unwrap();
        assert!(body.contains("pub struct RootAB {"));
        assert!(body.contains("pub struct RootAB2 {"));
        assert!(body.contains("#[allow(non_snake_case)]"));
    }

    #[test]
    fn test_keyword_fields() {
        let shape = Shape::record(
            "root",
            vec![
                Field::new("type", Shape::Scalar(ValueKind::Path)),
                Field::new("self", Shape::Scalar(ValueKind::Integer)),
            ],
        );
        let body = RustEmitter.emit(&shape, "  ").unwrap();
        assert!(body.contains("  pub r#type: PathBuf,"));
        assert!(body.contains("  #[serde(rename = \"self\")]\n  pub self_: i64,"));
    }

    fn frames(items: Vec<Shape>) -> Shape {
        Shape::record("root", vec![Field::new("frames", Shape::Tuple(items))])
    }

    #[test]
    fn test_twelve_slots_stay_a_tuple() {
        let body = RustEmitter
            .emit(&frames(vec![Shape::Scalar(ValueKind::Text); 12]), "    ")
            .unwrap();
        let expected = format!("    pub frames: ({}),", vec!["String"; 12].join(", "));
        assert!(body.contains(&expected), "{body}");
    }

    #[test]
    fn test_long_uniform_sequence_becomes_vec() {
        let body = RustEmitter
            .emit(&frames(vec![Shape::Scalar(ValueKind::Text); 13]), "    ")
            .unwrap();
        assert!(body.contains("    pub frames: Vec<String>,"), "{body}");
        assert!(!body.contains("(String, String"));
    }

    #[test]
    fn test_long_mixed_sequence_becomes_indexed_struct() {
        let mut items = vec![Shape::Scalar(ValueKind::Text); 12];
        items.push(Shape::Scalar(ValueKind::Map));
        items.insert(0, Shape::None);

        let body = RustEmitter.emit(&frames(items), "    ").unwrap();
        assert!(body.contains("    pub frames: RootFrames,"), "{body}");
        assert!(body.contains("pub struct RootFrames {"));
        assert!(body.contains("    pub index_0: (),\n    pub index_1: String,"));
        assert!(
            body.contains("    pub index_13: serde_json::Map<String, serde_json::Value>,\n}")
        );
    }

    #[test]
    fn test_long_sequence_of_records() {
        let items = (0..13)
            .map(|i| {
                Shape::record(
                    i.to_string(),
                    vec![Field::new("map", Shape::Scalar(ValueKind::Path))],
                )
            })
            .collect();

        let body = RustEmitter.emit(&frames(items), "  ").unwrap();
        assert!(body.contains("  pub frames: RootFrames,"), "{body}");
        assert!(body.contains("pub struct RootFrames0 {"));
        assert!(body.contains("  pub index_12: RootFrames12,"));
    }
}

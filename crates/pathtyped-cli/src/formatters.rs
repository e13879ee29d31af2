//! Output formatters for CLI commands.
//!
//! Every command result is serializable and goes through [`format_output`],
//! so all commands support the same JSON, text and pretty modes.

use crate::cli::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Formats data according to the specified output format.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Examples
///
/// ```
/// use pathtyped_cli::cli::OutputFormat;
/// use pathtyped_cli::formatters::format_output;
///
/// let output = format_output(&serde_json::json!({"status": "stale"}), OutputFormat::Text)?;
/// assert_eq!(output, r#"{"status":"stale"}"#);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => json::format_compact(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as indented JSON.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Formats data as single-line JSON.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/// Pretty (human-readable) output formatting.
///
/// Objects and arrays are rendered as an indented outline, one leaf per line:
///
/// ```text
/// data: "data"
/// speech
///   [0]: null
///   [1]: "first"
/// ```
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;

    /// Formats data as a colored outline.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        match &value {
            Value::Object(_) | Value::Array(_) => outline(&value, 0, &mut lines),
            scalar => lines.push(leaf(scalar)),
        }
        Ok(lines.join("\n"))
    }

    fn outline(value: &Value, depth: usize, lines: &mut Vec<String>) {
        let pad = "  ".repeat(depth);
        let children: Vec<(String, &Value)> = match value {
            Value::Object(map) => map
                .iter()
                .map(|(key, child)| (key.blue().bold().to_string(), child))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, child)| (format!("[{index}]").blue().to_string(), child))
                .collect(),
            _ => return,
        };

        for (label, child) in children {
            match child {
                Value::Object(map) if !map.is_empty() => {
                    lines.push(format!("{pad}{label}"));
                    outline(child, depth + 1, lines);
                }
                Value::Array(items) if !items.is_empty() => {
                    lines.push(format!("{pad}{label}"));
                    outline(child, depth + 1, lines);
                }
                _ => lines.push(format!("{pad}{label}: {}", leaf(child))),
            }
        }
    }

    fn leaf(value: &Value) -> String {
        match value {
            Value::Null => "null".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => format!("\"{}\"", s.green()),
            Value::Array(_) => "[]".to_string(),
            Value::Object(_) => "{}".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "data": "data",
            "speech": [null, "first"],
            "empty": {},
        })
    }

    #[test]
    fn test_json_format() {
        let output = json::format(&sample()).unwrap();
        assert!(output.contains("\"speech\": ["));
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_text_format_is_single_line() {
        let output = format_output(&sample(), OutputFormat::Text).unwrap();
        assert!(!output.contains('\n'));
        assert!(output.contains("\"data\":\"data\""));
    }

    #[test]
    fn test_pretty_outline() {
        colored::control::set_override(false);
        let output = pretty::format(&sample()).unwrap();
        let lines: Vec<_> = output.lines().collect();

        assert!(lines.contains(&"data: \"data\""));
        assert!(lines.contains(&"speech"));
        assert!(lines.contains(&"  [0]: null"));
        assert!(lines.contains(&"  [1]: \"first\""));
        assert!(lines.contains(&"empty: {}"));
    }

    #[test]
    fn test_pretty_scalar() {
        colored::control::set_override(false);
        assert_eq!(pretty::format(&42).unwrap(), "42");
    }
}

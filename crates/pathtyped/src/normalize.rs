//! Key normalization.
//!
//! Every map key must be usable as a field name in every target language, so
//! after all user rules have run the keys are rewritten to match
//! `[A-Za-z_][A-Za-z0-9_]*`.

use crate::context::Context;
use crate::middleware::Middleware;
use pathtyped_core::{Location, MapNode, Node, Result};
use tracing::{debug, warn};

/// Why a normalized key needed more than character replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    DigitPrefix,
    Empty,
}

fn normalize(name: &str) -> (String, Option<Adjustment>) {
    let replaced: String = name
        .trim_start_matches('_')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if replaced.is_empty() {
        ("_".to_string(), Some(Adjustment::Empty))
    } else if replaced.starts_with(|c: char| c.is_ascii_digit()) {
        (format!("index_{replaced}"), Some(Adjustment::DigitPrefix))
    } else {
        (replaced, None)
    }
}

/// Turns an arbitrary name into an identifier.
///
/// Leading underscores are stripped, every character outside
/// `[A-Za-z0-9_]` becomes `_`, a leading digit gets an `index_` prefix, and
/// an empty result becomes `_`.
///
/// # Examples
///
/// ```
/// use pathtyped::normalize_identifier;
///
/// assert_eq!(normalize_identifier("big-chest"), "big_chest");
/// assert_eq!(normalize_identifier("__init__"), "init__");
/// assert_eq!(normalize_identifier("1up"), "index_1up");
/// assert_eq!(normalize_identifier("___"), "_");
/// ```
#[must_use]
pub fn normalize_identifier(name: &str) -> String {
    normalize(name).0
}

/// Built-in rule that normalizes every map key.
///
/// It always runs last, after the user rules. Two keys normalizing to the
/// same identifier are a collision, handled by the configured policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeNames;

impl Middleware for NormalizeNames {
    fn apply(&self, ctx: &Context, location: &Location, node: &mut Node) -> Result<Option<Node>> {
        let Node::Map(map) = node else {
            return Ok(None);
        };

        let mut normalized = MapNode::new();
        for (key, entry) in std::mem::take(map) {
            let (name, adjustment) = normalize(&key);
            match adjustment {
                Some(Adjustment::DigitPrefix) => {
                    warn!("Property name starts with a digit at {location}.{key}, adding index_ prefix");
                }
                Some(Adjustment::Empty) => {
                    warn!("Property name {key:?} at {location} is empty once normalized, using \"_\"");
                }
                None => {}
            }
            if name != key {
                debug!("Renamed {location}.{key} -> {location}.{name}");
            }
            if normalized.contains_key(&name) {
                ctx.collision(location, &name, "name normalization")?;
            }
            normalized.insert(name, entry);
        }

        *map = normalized;
        Ok(None)
    }

    fn name(&self) -> &str {
        "normalize_names"
    }
}

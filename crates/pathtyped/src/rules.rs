//! The two canonical rules: extension stripping and regex grouping.
//!
//! # Examples
//!
//! ```
//! use pathtyped::{Context, Middleware, group_by, run_middlewares, strip_extensions};
//! use pathtyped_core::{Entry, MapNode, Node, ResourceConfig};
//!
//! let root: MapNode = ["data.txt", "speech_1.txt", "speech_2.txt"]
//!     .into_iter()
//!     .map(|name| (name, Entry::Raw(name.into())))
//!     .collect();
//!
//! let rules: Vec<Box<dyn Middleware>> = vec![
//!     Box::new(strip_extensions("txt|json").unwrap()),
//!     Box::new(group_by(r"(speech)_(\d)").unwrap()),
//! ];
//! let ctx = Context::new(".", ResourceConfig::default());
//! let root = run_middlewares(&ctx, &rules, Node::Map(root)).unwrap();
//!
//! let map = root.as_map().unwrap();
//! assert_eq!(map.keys().collect::<Vec<_>>(), vec!["speech", "data"]);
//! let speech = map.get("speech").and_then(Entry::as_node).unwrap();
//! assert_eq!(speech.len(), 3);
//! ```

use crate::context::Context;
use crate::middleware::Middleware;
use pathtyped_core::{Entry, Error, Location, MapNode, Node, Result, SeqNode};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Compiles `pattern` so that it must match a whole string.
fn full_match(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Renames `name.ext` keys to `name` when `ext` fully matches a pattern.
///
/// Only the last extension is considered, so `archive.tar.gz` is checked
/// against `gz`. Keys without a dot, or with nothing before the last dot, are
/// left alone.
#[derive(Debug, Clone)]
pub struct StripExtensions {
    pattern: Regex,
}

/// Creates an extension-strip rule.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] if `pattern` is not a valid regex.
///
/// # Examples
///
/// ```
/// use pathtyped::strip_extensions;
///
/// assert!(strip_extensions("txt|json").is_ok());
/// assert!(strip_extensions("(").unwrap_err().is_invalid_pattern());
/// ```
pub fn strip_extensions(pattern: &str) -> Result<StripExtensions> {
    Ok(StripExtensions {
        pattern: full_match(pattern)?,
    })
}

impl Middleware for StripExtensions {
    fn apply(&self, ctx: &Context, location: &Location, node: &mut Node) -> Result<Option<Node>> {
        let Node::Map(map) = node else {
            return Ok(None);
        };

        let keys: Vec<String> = map.keys().map(str::to_string).collect();
        for key in keys {
            let Some((name, ext)) = key.rsplit_once('.') else {
                continue;
            };
            if name.is_empty() || ext.is_empty() || !self.pattern.is_match(ext) {
                continue;
            }

            if map.contains_key(name) {
                ctx.collision(location, name, "extension strip")?;
            }
            if let Some(entry) = map.remove(&key) {
                debug!("Renamed {location}.{key} -> {location}.{name}");
                map.insert(name, entry);
            }
        }

        Ok(None)
    }

    fn name(&self) -> &str {
        "strip_extensions"
    }
}

/// Merges keys matching a pattern into nested maps and sequences.
///
/// The first capture group names the grouped field. Every further group is a
/// sub-key: all-digit sub-keys index a sequence, anything else keys a map.
/// With `(grass)(\d)(\d)`, the keys `grass00`, `grass01` and `grass10` become
/// `grass: [[grass00, grass01], [grass10]]`.
#[derive(Debug, Clone)]
pub struct GroupBy {
    pattern: Regex,
}

/// Creates a group-by rule.
///
/// # Errors
///
/// Returns [`Error::InvalidPattern`] if `pattern` is not a valid regex or
/// declares no capture group.
///
/// # Examples
///
/// ```
/// use pathtyped::group_by;
///
/// assert!(group_by(r"(speech)_(\d)").is_ok());
/// assert!(group_by(r"speech_\d").unwrap_err().is_invalid_pattern());
/// ```
pub fn group_by(pattern: &str) -> Result<GroupBy> {
    let regex = full_match(pattern)?;
    // captures_len counts the implicit whole-match group
    if regex.captures_len() < 2 {
        return Err(Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "at least one capture group is required".to_string(),
        });
    }
    Ok(GroupBy { pattern: regex })
}

/// One step below the grouped field.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SubKey {
    Name(String),
    Index(usize),
}

impl SubKey {
    fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            raw.parse().map_or_else(|_| Self::Name(raw.to_string()), Self::Index)
        } else {
            Self::Name(raw.to_string())
        }
    }
}

/// A matched entry and its remaining sub-key path, stored reversed so the
/// next step is at the end.
struct Pending {
    path: Vec<Option<SubKey>>,
    key: String,
    entry: Entry,
}

impl GroupBy {
    fn field_name<'k>(&self, key: &'k str) -> Option<&'k str> {
        self.pattern
            .captures(key)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn pending(&self, key: String, entry: Entry) -> Option<(String, Pending)> {
        let (field, path) = {
            let caps = self.pattern.captures(&key)?;
            let field = caps.get(1)?.as_str().to_string();
            let mut path: Vec<_> = caps
                .iter()
                .skip(2)
                .map(|group| group.map(|m| SubKey::parse(m.as_str())))
                .collect();
            path.reverse();
            (field, path)
        };
        Some((field, Pending { path, key, entry }))
    }
}

impl Middleware for GroupBy {
    fn apply(&self, ctx: &Context, location: &Location, node: &mut Node) -> Result<Option<Node>> {
        let Node::Map(map) = node else {
            return Ok(None);
        };
        if !map.keys().any(|key| self.field_name(key).is_some()) {
            return Ok(None);
        }

        let mut fields: Vec<(String, Vec<Pending>)> = Vec::new();
        let mut remainder = MapNode::new();
        let mut matched = 0;

        for (key, entry) in map.clone() {
            if !self.pattern.is_match(&key) {
                remainder.insert(key, entry);
                continue;
            }
            let Some((field, pending)) = self.pending(key, entry) else {
                warn!("{location}: grouped field missing, ignoring entry");
                continue;
            };
            matched += 1;
            match fields.iter_mut().find(|(name, _)| *name == field) {
                Some((_, group)) => group.push(pending),
                None => fields.push((field, vec![pending])),
            }
        }

        let mut grouped = MapNode::new();
        for (field, group) in fields {
            if let Some(entry) = reduce(ctx, &location.key(&field), &field, group)? {
                grouped.insert(field, entry);
            }
        }

        // Every match was dropped: keep the node as it was
        if grouped.is_empty() {
            return Ok(None);
        }
        info!("Found {matched} entries for {location}");

        for (key, entry) in remainder {
            if grouped.contains_key(&key) {
                ctx.collision(location, &key, "group-by merge")?;
            }
            grouped.insert(key, entry);
        }

        Ok(Some(Node::Map(grouped)))
    }

    fn name(&self) -> &str {
        "group_by"
    }
}

/// Folds entries sharing a path prefix into one entry.
///
/// Returns `None` when every entry had to be dropped.
fn reduce(
    ctx: &Context,
    location: &Location,
    key: &str,
    mut entries: Vec<Pending>,
) -> Result<Option<Entry>> {
    if entries.is_empty() {
        return Ok(None);
    }

    // Terminal: the first entry has no sub-keys left
    if entries[0].path.is_empty() {
        let first = entries.remove(0);
        for ignored in entries {
            ctx.collision(location, key, "group-by ambiguity")?;
            warn!("Ignoring {} at {location}, {} was seen first", ignored.key, first.key);
        }
        return Ok(Some(first.entry));
    }

    let by_index = entries
        .iter()
        .find_map(|pending| pending.path.last().cloned().flatten())
        .is_some_and(|head| matches!(head, SubKey::Index(_)));

    let mut names: Vec<(String, Vec<Pending>)> = Vec::new();
    let mut indices: BTreeMap<usize, Vec<Pending>> = BTreeMap::new();

    for mut pending in entries {
        match pending.path.pop() {
            None => {
                ctx.collision(location, key, "group-by ambiguity")?;
                warn!("Ignoring {} at {location}, a deeper entry exists", pending.key);
            }
            Some(None) => warn!("Sub-key missing for {} at {location}, ignoring", pending.key),
            Some(Some(SubKey::Index(index))) if by_index => {
                indices.entry(index).or_default().push(pending);
            }
            Some(Some(SubKey::Name(name))) if !by_index => {
                match names.iter_mut().find(|(existing, _)| *existing == name) {
                    Some((_, group)) => group.push(pending),
                    None => names.push((name, vec![pending])),
                }
            }
            Some(Some(other)) => {
                let (found, expected) = if by_index { ("a name", "indices") } else { ("an index", "names") };
                warn!(
                    "Sub-key {other:?} of {} at {location} is {found} where siblings use {expected}, ignoring",
                    pending.key
                );
            }
        }
    }

    if by_index {
        let Some(max) = indices.keys().next_back().copied() else {
            return Ok(None);
        };
        let mut seq = SeqNode::with_len(max + 1);
        for (index, group) in indices {
            if let Some(entry) = reduce(ctx, &location.index(index), key, group)? {
                seq.set(index, entry);
            }
        }
        Ok(Some(Entry::from(seq)))
    } else {
        if names.is_empty() {
            return Ok(None);
        }
        let mut map = MapNode::new();
        for (name, group) in names {
            if let Some(entry) = reduce(ctx, &location.key(&name), &name, group)? {
                map.insert(name, entry);
            }
        }
        Ok(Some(Entry::from(map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::apply_middleware;
    use pathtyped_core::{CollisionPolicy, ResourceConfig};
    use std::path::PathBuf;

    fn ctx() -> Context {
        Context::new("res", ResourceConfig::default())
    }

    fn strict() -> Context {
        Context::new(
            "res",
            ResourceConfig::builder()
                .on_collision(CollisionPolicy::Fail)
                .build(),
        )
    }

    fn raw(name: &str) -> Entry {
        Entry::Raw(PathBuf::from(name))
    }

    fn map_of(names: &[&str]) -> Node {
        Node::Map(names.iter().map(|name| (*name, raw(name))).collect())
    }

    fn run(ctx: &Context, rule: &dyn Middleware, node: Node) -> Result<Node> {
        apply_middleware(ctx, rule, node, &Location::root())
    }

    fn keys(node: &Node) -> Vec<&str> {
        node.as_map().unwrap().keys().collect()
    }

    #[test]
    fn test_strip_renames_matching_extensions() {
        let rule = strip_extensions("txt|json").unwrap();
        let node = run(&ctx(), &rule, map_of(&["data.txt", "main.json", "image.png"])).unwrap();

        assert_eq!(keys(&node), vec!["image.png", "data", "main"]);
        assert_eq!(node.as_map().unwrap().get("data"), Some(&raw("data.txt")));
    }

    #[test]
    fn test_strip_uses_last_extension_only() {
        let rule = strip_extensions("gz").unwrap();
        let node = run(&ctx(), &rule, map_of(&["archive.tar.gz", ".gz", "plain"])).unwrap();
        assert_eq!(keys(&node), vec![".gz", "plain", "archive.tar"]);
    }

    #[test]
    fn test_strip_requires_full_extension_match() {
        let rule = strip_extensions("tx").unwrap();
        let node = run(&ctx(), &rule, map_of(&["data.txt"])).unwrap();
        assert_eq!(keys(&node), vec!["data.txt"]);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let rule = strip_extensions(".*").unwrap();
        let once = run(&ctx(), &rule, map_of(&["a.txt", "b.png", "c"])).unwrap();
        let twice = run(&ctx(), &rule, once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_collision_overwrites_in_place() {
        let rule = strip_extensions("txt|json").unwrap();
        let node = run(&ctx(), &rule, map_of(&["data", "data.txt", "other"])).unwrap();

        assert_eq!(keys(&node), vec!["data", "other"]);
        assert_eq!(node.as_map().unwrap().get("data"), Some(&raw("data.txt")));
    }

    #[test]
    fn test_strip_collision_fails_under_strict_policy() {
        let rule = strip_extensions("txt|json").unwrap();
        let err = run(&strict(), &rule, map_of(&["data.json", "data.txt"])).unwrap_err();
        assert!(err.is_key_collision());
    }

    #[test]
    fn test_group_into_sequence_with_gap() {
        let rule = group_by(r"(speech)_(\d)").unwrap();
        let node = run(&ctx(), &rule, map_of(&["data", "speech_1", "speech_2"])).unwrap();

        assert_eq!(keys(&node), vec!["speech", "data"]);
        let speech = node.as_map().unwrap().get("speech").and_then(Entry::as_node).unwrap();
        let seq = speech.as_seq().unwrap();
        assert_eq!(seq.len(), 3);
        assert!(seq.get(0).unwrap().is_absent());
        assert_eq!(seq.get(1), Some(&raw("speech_1")));
        assert_eq!(seq.get(2), Some(&raw("speech_2")));
    }

    #[test]
    fn test_group_grid() {
        let rule = group_by(r"(grass)(\d)(\d)").unwrap();
        let node = run(&ctx(), &rule, map_of(&["grass00", "grass01", "grass10", "grass12"])).unwrap();

        let grass = node.as_map().unwrap().get("grass").and_then(Entry::as_node).unwrap();
        let rows = grass.as_seq().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.get(0).and_then(Entry::as_node).map(Node::len), Some(2));
        let second = rows.get(1).and_then(Entry::as_node).and_then(Node::as_seq).unwrap();
        assert_eq!(second.len(), 3);
        assert!(second.get(1).unwrap().is_absent());
        assert_eq!(second.get(2), Some(&raw("grass12")));
    }

    #[test]
    fn test_group_named_sub_keys() {
        let rule = group_by(r"(player)_(\w+)").unwrap();
        let node = run(&ctx(), &rule, map_of(&["player_idle", "player_run"])).unwrap();

        let player = node.as_map().unwrap().get("player").and_then(Entry::as_node).unwrap();
        assert_eq!(
            player.as_map().unwrap().keys().collect::<Vec<_>>(),
            vec!["idle", "run"]
        );
    }

    #[test]
    fn test_group_ambiguity_keeps_first() {
        let rule = group_by(r"(speech)_(\d)\w*").unwrap();
        let node = run(&ctx(), &rule, map_of(&["speech_1a", "speech_1b"])).unwrap();

        let speech = node.as_map().unwrap().get("speech").and_then(Entry::as_node).unwrap();
        assert_eq!(speech.as_seq().unwrap().get(1), Some(&raw("speech_1a")));
    }

    #[test]
    fn test_group_ambiguity_fails_under_strict_policy() {
        let rule = group_by(r"(speech)_(\d)\w*").unwrap();
        let err = run(&strict(), &rule, map_of(&["speech_1a", "speech_1b"])).unwrap_err();
        assert!(err.is_key_collision());
    }

    #[test]
    fn test_group_mismatched_sub_key_kind_dropped() {
        let rule = group_by(r"(s)_(\w+)").unwrap();
        let node = run(&ctx(), &rule, map_of(&["s_0", "s_x", "s_1"])).unwrap();

        let s = node.as_map().unwrap().get("s").and_then(Entry::as_node).unwrap();
        let seq = s.as_seq().unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(1), Some(&raw("s_1")));
    }

    #[test]
    fn test_group_missing_sub_key_dropped() {
        let rule = group_by(r"(a)(?:_(\d))?").unwrap();
        let node = run(&ctx(), &rule, map_of(&["a_1", "a"])).unwrap();

        let a = node.as_map().unwrap().get("a").and_then(Entry::as_node).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a.as_seq().unwrap().get(1), Some(&raw("a_1")));
    }

    #[test]
    fn test_group_keeps_node_when_every_match_is_dropped() {
        let rule = group_by(r"(a)?_(\d)").unwrap();
        let original = map_of(&["_1", "_2", "b"]);
        let node = run(&ctx(), &rule, original.clone()).unwrap();
        assert_eq!(node, original);
    }

    #[test]
    fn test_group_keeps_node_when_every_sub_key_is_dropped() {
        let rule = group_by(r"(a)(?:_(\d))?").unwrap();
        let original = map_of(&["a", "c"]);
        let node = run(&ctx(), &rule, original.clone()).unwrap();
        assert_eq!(node, original);
    }

    #[test]
    fn test_group_remainder_wins() {
        let rule = group_by(r"(speech)_(\d)").unwrap();
        let node = run(&ctx(), &rule, map_of(&["speech_0", "speech"])).unwrap();
        assert_eq!(node.as_map().unwrap().get("speech"), Some(&raw("speech")));
    }

    #[test]
    fn test_group_without_match_is_untouched() {
        let rule = group_by(r"(speech)_(\d)").unwrap();
        let original = map_of(&["b", "a"]);
        let node = run(&ctx(), &rule, original.clone()).unwrap();
        assert_eq!(node, original);
    }

    #[test]
    fn test_group_applies_in_nested_maps() {
        let mut inner = MapNode::new();
        inner.insert("npc1", raw("npc1"));
        inner.insert("npc2", raw("npc2"));
        let mut root = MapNode::new();
        root.insert("level", Entry::from(inner));

        let rule = group_by(r"(npc)(\d)").unwrap();
        let node = run(&ctx(), &rule, Node::Map(root)).unwrap();
        let level = node.as_map().unwrap().get("level").and_then(Entry::as_node).unwrap();
        let npc = level.as_map().unwrap().get("npc").and_then(Entry::as_node).unwrap();
        assert_eq!(npc.len(), 3);
    }

    #[test]
    fn test_sub_key_parse() {
        assert_eq!(SubKey::parse("12"), SubKey::Index(12));
        assert_eq!(SubKey::parse("1a"), SubKey::Name("1a".to_string()));
        assert_eq!(SubKey::parse(""), SubKey::Name(String::new()));
    }
}

//! Structural rewrite rules.
//!
//! A [`Middleware`] is invoked on every map and sequence node of the tree,
//! depth-first and post-order: children are rewritten before their parent,
//! so a rule always sees already-rewritten children. Returning a replacement
//! node swaps it into the parent; returning `None` keeps the (possibly
//! mutated) node in place. The root is handled the same way, so a rule can
//! replace it.
//!
//! Rules run one after another, each over the whole tree.
//!
//! # Examples
//!
//! ```
//! use pathtyped::{Context, middleware_fn, run_middlewares, Middleware};
//! use pathtyped_core::{Entry, MapNode, Node, ResourceConfig};
//!
//! // Drops every key named "draft"
//! let drop_drafts = middleware_fn(|_, _, node: &mut Node| {
//!     if let Node::Map(map) = node {
//!         map.remove("draft");
//!     }
//!     Ok(None)
//! });
//!
//! let mut root = MapNode::new();
//! root.insert("draft", Entry::Absent);
//! root.insert("final", Entry::Absent);
//!
//! let ctx = Context::new("res", ResourceConfig::default());
//! let rules: Vec<Box<dyn Middleware>> = vec![Box::new(drop_drafts)];
//! let root = run_middlewares(&ctx, &rules, Node::Map(root)).unwrap();
//!
//! assert_eq!(root.as_map().unwrap().keys().collect::<Vec<_>>(), vec!["final"]);
//! ```

use crate::context::Context;
use pathtyped_core::{Entry, Location, MapNode, Node, Result};
use std::fmt;
use tracing::debug;

/// A structural rewrite rule.
pub trait Middleware: Send + Sync {
    /// Rewrites one node.
    ///
    /// `node`'s children have already been processed by this rule. Return
    /// `Ok(Some(replacement))` to replace the node, or `Ok(None)` to keep it.
    ///
    /// # Errors
    ///
    /// Any error aborts construction.
    fn apply(&self, ctx: &Context, location: &Location, node: &mut Node) -> Result<Option<Node>>;

    /// Name used in debug logs.
    fn name(&self) -> &str {
        "middleware"
    }
}

/// A middleware built from a closure by [`middleware_fn`].
pub struct FnMiddleware<F> {
    func: F,
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").finish_non_exhaustive()
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&Context, &Location, &mut Node) -> Result<Option<Node>> + Send + Sync,
{
    fn apply(&self, ctx: &Context, location: &Location, node: &mut Node) -> Result<Option<Node>> {
        (self.func)(ctx, location, node)
    }
}

/// Builds a middleware from a closure over `(ctx, location, node)`.
pub const fn middleware_fn<F>(func: F) -> FnMiddleware<F>
where
    F: Fn(&Context, &Location, &mut Node) -> Result<Option<Node>> + Send + Sync,
{
    FnMiddleware { func }
}

/// Applies one rule to `node` and everything below it.
///
/// # Errors
///
/// Propagates the first error returned by the rule.
pub fn apply_middleware(
    ctx: &Context,
    rule: &dyn Middleware,
    mut node: Node,
    location: &Location,
) -> Result<Node> {
    match &mut node {
        Node::Map(map) => {
            for (key, entry) in map.iter_mut() {
                if let Entry::Node(child) = entry {
                    rewrite_child(ctx, rule, child, &location.key(key))?;
                }
            }
        }
        Node::Seq(seq) => {
            for (index, entry) in seq.iter_mut().enumerate() {
                if let Entry::Node(child) = entry {
                    rewrite_child(ctx, rule, child, &location.index(index))?;
                }
            }
        }
    }

    match rule.apply(ctx, location, &mut node)? {
        Some(replacement) => {
            debug!("{}: replaced node at {location}", rule.name());
            Ok(replacement)
        }
        None => Ok(node),
    }
}

fn rewrite_child(
    ctx: &Context,
    rule: &dyn Middleware,
    child: &mut Node,
    location: &Location,
) -> Result<()> {
    let taken = std::mem::replace(child, Node::Map(MapNode::new()));
    *child = apply_middleware(ctx, rule, taken, location)?;
    Ok(())
}

/// Runs every rule in order over the whole tree, starting at the root.
///
/// # Errors
///
/// Propagates the first error returned by any rule.
pub fn run_middlewares(ctx: &Context, rules: &[Box<dyn Middleware>], root: Node) -> Result<Node> {
    rules.iter().try_fold(root, |tree, rule| {
        debug!("Applying {}", rule.name());
        apply_middleware(ctx, rule.as_ref(), tree, &Location::root())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathtyped_core::{ResourceConfig, SeqNode};
    use std::sync::Mutex;

    fn ctx() -> Context {
        Context::new("res", ResourceConfig::default())
    }

    fn nested() -> Node {
        let mut inner = MapNode::new();
        inner.insert("leaf", Entry::Absent);
        let mut seq = SeqNode::new();
        seq.push(Entry::from(MapNode::new()));

        let mut root = MapNode::new();
        root.insert("inner", Entry::from(inner));
        root.insert("list", Entry::from(seq));
        Node::Map(root)
    }

    #[test]
    fn test_post_order_visit() {
        let visited = Mutex::new(Vec::new());
        let rule = middleware_fn(|_, location: &Location, _: &mut Node| {
            visited.lock().unwrap().push(location.to_string());
            Ok(None)
        });

        apply_middleware(&ctx(), &rule, nested(), &Location::root()).unwrap();
        assert_eq!(
            *visited.lock().unwrap(),
            vec!["root.inner", "root.list[0]", "root.list", "root"]
        );
    }

    #[test]
    fn test_replacement_of_child() {
        let rule = middleware_fn(|_, location: &Location, _: &mut Node| {
            if location.as_str() == "root.inner" {
                return Ok(Some(Node::Seq(SeqNode::with_len(2))));
            }
            Ok(None)
        });

        let root = apply_middleware(&ctx(), &rule, nested(), &Location::root()).unwrap();
        let inner = root.as_map().unwrap().get("inner").unwrap();
        assert_eq!(inner.as_node().map(Node::len), Some(2));
    }

    #[test]
    fn test_replacement_of_root() {
        let rule = middleware_fn(|_, location: &Location, _: &mut Node| {
            if location.as_str() == "root" {
                return Ok(Some(Node::Seq(SeqNode::new())));
            }
            Ok(None)
        });

        let root = apply_middleware(&ctx(), &rule, nested(), &Location::root()).unwrap();
        assert!(root.as_seq().is_some());
    }

    #[test]
    fn test_rules_run_in_order() {
        let add = middleware_fn(|_, location: &Location, node: &mut Node| {
            if location.as_str() == "root"
                && let Node::Map(map) = node
            {
                map.insert("added", Entry::Absent);
            }
            Ok(None)
        });
        let check = middleware_fn(|_, location: &Location, node: &mut Node| {
            if location.as_str() == "root" {
                assert!(node.as_map().unwrap().contains_key("added"));
            }
            Ok(None)
        });

        let rules: Vec<Box<dyn Middleware>> = vec![Box::new(add), Box::new(check)];
        let root = run_middlewares(&ctx(), &rules, nested()).unwrap();
        assert_eq!(root.len(), 3);
    }

    #[test]
    fn test_error_aborts() {
        let rule = middleware_fn(|_, location: &Location, _: &mut Node| {
            Err(pathtyped_core::Error::InvalidTree {
                location: location.to_string(),
                reason: "rejected".to_string(),
            })
        });

        let err = apply_middleware(&ctx(), &rule, nested(), &Location::root()).unwrap_err();
        assert!(err.is_invalid_tree());
        assert!(err.to_string().contains("root.inner"));
    }
}

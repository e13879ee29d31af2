//! Loading and declaring in a single traversal.
//!
//! The normalized tree is walked once. Every leaf goes through the loader
//! pipeline, and every map and sequence yields both the runtime
//! [`Resource`] and its [`Shape`]. Building the two side by side keeps
//! their field names and order identical at every depth.

use crate::context::Context;
use crate::loader::{Loader, load_leaf};
use pathtyped_codegen::{Field, Shape};
use pathtyped_core::{Entry, Leaf, Location, MapNode, Node, Record, Resource, Result, SeqNode};
use tracing::debug;

/// Loads every leaf under `root` and derives the matching shape.
///
/// The root record is named `root`; nested records take the key they were
/// found under, and records inside a sequence take their index.
///
/// # Errors
///
/// Returns [`Error::LoaderFailure`](pathtyped_core::Error::LoaderFailure)
/// when an unwrapped loader fails.
///
/// # Examples
///
/// ```
/// use pathtyped::{Context, resolve};
/// use pathtyped_core::{Entry, MapNode, ResourceConfig, Value};
///
/// let mut root = MapNode::new();
/// root.insert("answer", Entry::Loaded(Value::Integer(42)));
/// root.insert("missing", Entry::Absent);
///
/// let ctx = Context::new("res", ResourceConfig::default());
/// let (resource, shape) = resolve(&ctx, &[], &root).unwrap();
///
/// assert_eq!(resource.field_names(), shape.field_names());
/// assert_eq!(resource["answer"].as_value(), Some(&Value::Integer(42)));
/// assert!(resource["missing"].is_none());
/// ```
pub fn resolve(
    ctx: &Context,
    loaders: &[Box<dyn Loader>],
    root: &MapNode,
) -> Result<(Resource, Shape)> {
    let resolver = Resolver { ctx, loaders };
    let resolved = resolver.map(root, "root", &Location::root())?;
    debug!("Resolved {} leaves", resolved.1.leaf_count());
    Ok(resolved)
}

struct Resolver<'a> {
    ctx: &'a Context,
    loaders: &'a [Box<dyn Loader>],
}

impl Resolver<'_> {
    fn map(&self, map: &MapNode, name: &str, location: &Location) -> Result<(Resource, Shape)> {
        let mut values = Vec::with_capacity(map.len());
        let mut fields = Vec::with_capacity(map.len());

        for (key, entry) in map.iter() {
            let (resource, shape) = self.entry(entry, key, &location.key(key))?;
            values.push((key.to_string(), resource));
            fields.push(Field::new(key, shape));
        }

        Ok((
            Resource::Record(Record::new(name, values)),
            Shape::record(name, fields),
        ))
    }

    fn seq(&self, seq: &SeqNode, location: &Location) -> Result<(Resource, Shape)> {
        let mut items = Vec::with_capacity(seq.len());
        let mut shapes = Vec::with_capacity(seq.len());

        for (index, entry) in seq.iter().enumerate() {
            let (resource, shape) =
                self.entry(entry, &index.to_string(), &location.index(index))?;
            items.push(resource);
            shapes.push(shape);
        }

        Ok((Resource::Tuple(items), Shape::Tuple(shapes)))
    }

    fn entry(&self, entry: &Entry, name: &str, location: &Location) -> Result<(Resource, Shape)> {
        match entry {
            Entry::Node(Node::Map(map)) => self.map(map, name, location),
            Entry::Node(Node::Seq(seq)) => self.seq(seq, location),
            Entry::Absent => Ok((Resource::None, Shape::None)),
            Entry::Raw(path) => self.leaf(Leaf::Path(path), location),
            Entry::Loaded(value) => self.leaf(Leaf::Value(value), location),
        }
    }

    fn leaf(&self, leaf: Leaf<'_>, location: &Location) -> Result<(Resource, Shape)> {
        let value = load_leaf(self.ctx, self.loaders, location, leaf)?;
        let kind = value.kind();
        Ok((Resource::Value(value), Shape::Scalar(kind)))
    }
}

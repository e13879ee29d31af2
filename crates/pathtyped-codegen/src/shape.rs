//! Language-neutral description of a resolved tree.
//!
//! A [`Shape`] mirrors the resolved resource tree node for node: records for
//! maps, tuples for sequences and scalars for loaded leaves. Emitters render
//! shapes into declarations for a target language.

use pathtyped_core::ValueKind;

/// Type shape of one node in the resolved tree.
///
/// # Examples
///
/// ```
/// use pathtyped_codegen::{Field, Shape};
/// use pathtyped_core::ValueKind;
///
/// let shape = Shape::record(
///     "root",
///     vec![
///         Field::new("main", Shape::Scalar(ValueKind::Text)),
///         Field::new("speech", Shape::Tuple(vec![Shape::None, Shape::Scalar(ValueKind::Text)])),
///     ],
/// );
///
/// assert_eq!(shape.field_names(), vec!["main", "speech"]);
/// assert_eq!(shape.leaf_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Named fields in declaration order
    Record {
        /// Type name (the key the record was found under, or `root`)
        name: String,
        /// Fields in declaration order
        fields: Vec<Field>,
    },
    /// Fixed-size positional elements
    Tuple(Vec<Shape>),
    /// A loaded leaf of the given kind
    Scalar(ValueKind),
    /// An absent slot
    None,
}

/// One named field of a [`Shape::Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name, already normalized into an identifier
    pub name: String,
    /// Shape of the field value
    pub shape: Shape,
}

impl Field {
    /// Creates a field.
    #[must_use]
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

impl Shape {
    /// Creates a record shape.
    #[must_use]
    pub fn record(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::Record {
            name: name.into(),
            fields,
        }
    }

    /// Field names of a record, in declaration order. Empty otherwise.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            Self::Record { fields, .. } => fields.iter().map(|f| f.name.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the named field of a record.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Record { fields, .. } => {
                fields.iter().find(|f| f.name == name).map(|f| &f.shape)
            }
            _ => None,
        }
    }

    /// Calls `visit` for every leaf in depth-first order.
    ///
    /// Scalars report their kind and absent slots report `None`.
    pub fn for_each_leaf(&self, visit: &mut impl FnMut(Option<ValueKind>)) {
        match self {
            Self::Record { fields, .. } => {
                for field in fields {
                    field.shape.for_each_leaf(visit);
                }
            }
            Self::Tuple(items) => {
                for item in items {
                    item.for_each_leaf(visit);
                }
            }
            Self::Scalar(kind) => visit(Some(*kind)),
            Self::None => visit(None),
        }
    }

    /// Number of leaves (scalars and absent slots).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(&mut |_| count += 1);
        count
    }
}

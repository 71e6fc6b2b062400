//! Node storage: arena handles and the node record.
//!
//! Shared identity (DEF/USE) is expressed through names, never through
//! multiple ownership: the document owns every node in an arena, tree
//! slots hold handles, and a "reference" node is just a handle lookup
//! performed at encode time.

use smallvec::SmallVec;

use super::field::FieldValue;
use super::schema::NodeType;

/// Stable index of a node in a document's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub(crate) u32);

impl NodeHandle {
    /// Arena index.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A scene graph node.
///
/// Invariant: `declared_name` and `reference_name` are never both set. A
/// reference node carries no fields or children of its own; it is resolved
/// by name lookup at serialization time.
#[derive(Clone, Debug)]
pub struct Node {
    pub node_type: NodeType,
    pub declared_name: Option<String>,
    pub reference_name: Option<String>,
    pub(crate) fields: SmallVec<[(&'static str, FieldValue); 8]>,
    pub(crate) children: Vec<NodeHandle>,
}

impl Node {
    pub(crate) fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            declared_name: None,
            reference_name: None,
            fields: SmallVec::new(),
            children: Vec::new(),
        }
    }

    /// True if this node is a lightweight reference (USE) to a name.
    #[inline]
    pub fn is_reference(&self) -> bool {
        self.reference_name.is_some()
    }

    /// Field value by name, if set.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    /// Child handles in order.
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    pub(crate) fn set_field_value(&mut self, name: &'static str, value: FieldValue) {
        for (n, v) in &mut self.fields {
            if *n == name {
                *v = value;
                return;
            }
        }
        self.fields.push((name, value));
    }
}

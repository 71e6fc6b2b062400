//! Document: node arena, root, and the declared-name registry.

use std::collections::HashMap;

use tracing::trace;

use super::field::{FieldKind, FieldValue};
use super::node::{Node, NodeHandle};
use super::schema::NodeType;
use crate::util::{Error, Result};

/// A scene document: arena of nodes, a root handle, and the name registry
/// mapping each declared name to its node.
///
/// One document per export run; there is no shared mutable state between
/// concurrent exports.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeHandle,
    registry: HashMap<String, NodeHandle>,
}

impl Document {
    /// Create a document whose root is a fresh node of the given type.
    pub fn with_root(root_type: NodeType) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeHandle(0),
            registry: HashMap::new(),
        };
        doc.root = doc.create_node(root_type);
        doc
    }

    /// Create a document with an `X3D` root.
    pub fn new() -> Self {
        Self::with_root(NodeType::X3D)
    }

    /// Root node handle.
    #[inline]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Number of nodes in the arena (live and abandoned).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a new node of the given type.
    pub fn create_node(&mut self, node_type: NodeType) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len() as u32);
        self.nodes.push(Node::new(node_type));
        handle
    }

    /// Create a lightweight reference (USE) node.
    ///
    /// The name does not have to be registered yet; forward references are
    /// legal and fixed up by the resolver.
    pub fn reference(&mut self, node_type: NodeType, name: impl Into<String>) -> NodeHandle {
        let handle = self.create_node(node_type);
        self.nodes[handle.index()].reference_name = Some(name.into());
        handle
    }

    /// Node by handle.
    #[inline]
    pub fn node(&self, handle: NodeHandle) -> &Node {
        &self.nodes[handle.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: NodeHandle) -> &mut Node {
        &mut self.nodes[handle.index()]
    }

    /// Set a field, validating name and value kind against the schema.
    ///
    /// Float payloads are clamped to finite values here, so malformed
    /// numeric input never reaches an encoder.
    pub fn set_field(
        &mut self,
        handle: NodeHandle,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<()> {
        let value = value.into();
        let node_type = self.node(handle).node_type;
        let spec = node_type.spec();

        let Some(field_spec) = spec.fields.iter().find(|f| f.name == name) else {
            return Err(Error::UnknownField {
                node_type: spec.element,
                field: name.to_string(),
            });
        };
        if field_spec.kind != value.kind() {
            return Err(Error::TypeMismatch {
                node_type: spec.element,
                field: field_spec.name,
                expected: field_spec.kind.name(),
                actual: value.kind().name(),
            });
        }

        self.node_mut(handle).set_field_value(field_spec.name, value.sanitized());
        Ok(())
    }

    /// Append a child, legal only for types whose schema has a children slot.
    pub fn append_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        let parent_type = self.node(parent).node_type;
        if !parent_type.has_children_slot() {
            return Err(Error::NoChildrenSlot(parent_type.element_name()));
        }
        self.node_mut(parent).children.push(child);
        Ok(())
    }

    /// Declare a node under a name (DEF).
    ///
    /// Fails with `DuplicateDeclaration` if the name is already registered;
    /// the build order is the builder's responsibility, while out-of-order
    /// *references* are the resolver's.
    pub fn declare(&mut self, handle: NodeHandle, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.node(handle).is_reference() {
            return Err(Error::ReferenceNotAllowed(name));
        }
        if self.registry.contains_key(&name) {
            return Err(Error::DuplicateDeclaration(name));
        }
        trace!(name = %name, "declare");
        self.node_mut(handle).declared_name = Some(name.clone());
        self.registry.insert(name, handle);
        Ok(())
    }

    /// Registered node for a declared name.
    pub fn lookup(&self, name: &str) -> Option<NodeHandle> {
        self.registry.get(name).copied()
    }

    /// Kind of a field on a node's type (schema passthrough).
    pub fn field_kind(&self, handle: NodeHandle, name: &str) -> Option<FieldKind> {
        self.node(handle).node_type.field_kind(name)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

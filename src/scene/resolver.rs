//! Declaration/reference canonicalization.
//!
//! Scene traversal order does not match logical declaration order: a
//! builder may emit a reference to a name before the node declaring that
//! name is reached (a shared mesh group referenced by an early sibling but
//! declared by a later one). This pass rewrites the finished tree so that
//! each name has exactly one declaration, placed at the first occurrence
//! in traversal order, and every other occurrence is a reference.
//!
//! Slots, not node bodies, are rewritten: every tree position (a child
//! index or a node-valued field) holds a handle, and the pass swaps handle
//! values. Running the pass twice is a no-op.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::document::Document;
use super::field::{FieldKind, FieldValue};
use super::node::NodeHandle;
use crate::util::{Error, Result};

/// A rewritable tree position holding a node handle.
#[derive(Clone, Copy, Debug)]
enum Slot {
    /// `parent.children[index]`
    Child { parent: NodeHandle, index: usize },
    /// Single-node field (`geometry`, `skinCoord`, ...)
    Field { parent: NodeHandle, field: usize },
    /// Entry of a node-list field (`children` of the root scene are a
    /// children slot; `skeleton`, `joints`, `motions`, ... are lists)
    FieldItem { parent: NodeHandle, field: usize, item: usize },
}

fn slot_get(doc: &Document, slot: Slot) -> NodeHandle {
    match slot {
        Slot::Child { parent, index } => doc.node(parent).children[index],
        Slot::Field { parent, field } => match &doc.node(parent).fields[field].1 {
            FieldValue::Node(h) => *h,
            _ => unreachable!("slot points at non-node field"),
        },
        Slot::FieldItem { parent, field, item } => match &doc.node(parent).fields[field].1 {
            FieldValue::NodeList(hs) => hs[item],
            _ => unreachable!("slot points at non-list field"),
        },
    }
}

fn slot_set(doc: &mut Document, slot: Slot, handle: NodeHandle) {
    match slot {
        Slot::Child { parent, index } => doc.node_mut(parent).children[index] = handle,
        Slot::Field { parent, field } => match &mut doc.node_mut(parent).fields[field].1 {
            FieldValue::Node(h) => *h = handle,
            _ => unreachable!("slot points at non-node field"),
        },
        Slot::FieldItem { parent, field, item } => {
            match &mut doc.node_mut(parent).fields[field].1 {
                FieldValue::NodeList(hs) => hs[item] = handle,
                _ => unreachable!("slot points at non-list field"),
            }
        }
    }
}

#[derive(Default)]
struct Resolver {
    /// Canonical declaration per name (first seen in traversal order).
    defs: HashMap<String, NodeHandle>,
    /// Every reference site per name, in traversal order.
    uses: HashMap<String, Vec<Slot>>,
    /// Reference sites recorded before any declaration of the name.
    pending: HashMap<String, Vec<Slot>>,
    /// First-use order, for deterministic dangling-reference reporting.
    use_order: Vec<(String, &'static str)>,
}

impl Resolver {
    fn visit_slot(&mut self, doc: &mut Document, slot: Slot) -> Result<()> {
        let handle = slot_get(doc, slot);
        let node_type = doc.node(handle).node_type;

        if let Some(name) = doc.node(handle).reference_name.clone() {
            if !self.uses.contains_key(&name) {
                self.use_order.push((name.clone(), node_type.element_name()));
            }
            self.uses.entry(name.clone()).or_default().push(slot);
            if !self.defs.contains_key(&name) {
                debug!(name = %name, "reference occurs before declaration");
                self.pending.entry(name).or_default().push(slot);
            }
            // A reference has no substructure of its own.
            return Ok(());
        }

        if let Some(name) = doc.node(handle).declared_name.clone() {
            if self.defs.contains_key(&name) {
                // Duplicate declaration: keep the first as canonical and
                // degrade this site to a reference. The duplicate's
                // subtree is abandoned, not traversed.
                warn!(name = %name, "duplicate declaration degraded to reference");
                let use_node = doc.reference(node_type, name);
                slot_set(doc, slot, use_node);
                return Ok(());
            }

            self.defs.insert(name.clone(), handle);
            if let Some(pending) = self.pending.remove(&name) {
                // Swap the declared node into the first forward-reference
                // site and leave a reference at the declaration site. The
                // node object is unchanged; only slot contents move.
                debug!(name = %name, sites = pending.len(), "swapping declaration into earlier reference site");
                slot_set(doc, pending[0], handle);
                let use_node = doc.reference(node_type, name);
                slot_set(doc, slot, use_node);
            }
        }

        self.visit_into(doc, handle)
    }

    /// Traverse every structural slot of a concrete node: the children
    /// list plus all node-valued fields, single or list.
    fn visit_into(&mut self, doc: &mut Document, handle: NodeHandle) -> Result<()> {
        let child_count = doc.node(handle).children.len();
        for index in 0..child_count {
            self.visit_slot(doc, Slot::Child { parent: handle, index })?;
        }

        let field_count = doc.node(handle).fields.len();
        for field in 0..field_count {
            match doc.node(handle).fields[field].1.kind() {
                FieldKind::Node => {
                    self.visit_slot(doc, Slot::Field { parent: handle, field })?;
                }
                FieldKind::NodeList => {
                    let items = match &doc.node(handle).fields[field].1 {
                        FieldValue::NodeList(hs) => hs.len(),
                        _ => unreachable!(),
                    };
                    for item in 0..items {
                        self.visit_slot(doc, Slot::FieldItem { parent: handle, field, item })?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn check_dangling(&self) -> Result<()> {
        for (name, node_type) in &self.use_order {
            if !self.defs.contains_key(name) {
                return Err(Error::DanglingReference {
                    name: name.clone(),
                    node_type: *node_type,
                });
            }
        }
        Ok(())
    }
}

/// Resolve all declarations and references in a document.
///
/// After one pass every declared name has exactly one declaring node at
/// its first traversal-order occurrence, all other occurrences are
/// references, and a reference to a never-declared name is reported as
/// [`Error::DanglingReference`]. Idempotent.
pub fn resolve(doc: &mut Document) -> Result<()> {
    let mut resolver = Resolver::default();
    let root = doc.root();
    resolver.visit_into(doc, root)?;
    resolver.check_dangling()?;
    debug!(
        declarations = resolver.defs.len(),
        references = resolver.uses.values().map(Vec::len).sum::<usize>(),
        "document resolved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeType;

    fn group_doc() -> Document {
        Document::with_root(NodeType::Scene)
    }

    #[test]
    fn test_forward_reference_swap() {
        // Traversal order [USE "A", DEF "A"]: after resolution the first
        // slot holds the declared node (identity-equal) and the second
        // holds a reference.
        let mut doc = group_doc();
        let root = doc.root();
        let use_site = doc.reference(NodeType::Group, "A");
        doc.append_child(root, use_site).unwrap();
        let def_site = doc.create_node(NodeType::Group);
        doc.declare(def_site, "A").unwrap();
        doc.append_child(root, def_site).unwrap();

        resolve(&mut doc).unwrap();

        let children = doc.node(root).children();
        assert_eq!(children[0], def_site, "declared node swapped into first slot");
        let second = doc.node(children[1]);
        assert!(second.is_reference());
        assert_eq!(second.reference_name.as_deref(), Some("A"));
    }

    #[test]
    fn test_reference_after_declaration_untouched() {
        let mut doc = group_doc();
        let root = doc.root();
        let def_site = doc.create_node(NodeType::Group);
        doc.declare(def_site, "A").unwrap();
        doc.append_child(root, def_site).unwrap();
        let use_site = doc.reference(NodeType::Group, "A");
        doc.append_child(root, use_site).unwrap();

        resolve(&mut doc).unwrap();

        let children: Vec<_> = doc.node(root).children().to_vec();
        assert_eq!(children, vec![def_site, use_site]);
    }

    #[test]
    fn test_dangling_reference() {
        let mut doc = group_doc();
        let root = doc.root();
        let use_site = doc.reference(NodeType::Group, "X");
        doc.append_child(root, use_site).unwrap();

        let err = resolve(&mut doc).unwrap_err();
        match err {
            Error::DanglingReference { name, node_type } => {
                assert_eq!(name, "X");
                assert_eq!(node_type, "Group");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_idempotence() {
        let mut doc = group_doc();
        let root = doc.root();
        let use_site = doc.reference(NodeType::Group, "A");
        doc.append_child(root, use_site).unwrap();
        let def_site = doc.create_node(NodeType::Group);
        doc.declare(def_site, "A").unwrap();
        doc.append_child(root, def_site).unwrap();

        resolve(&mut doc).unwrap();
        let snapshot: Vec<_> = doc.node(root).children().to_vec();
        resolve(&mut doc).unwrap();
        assert_eq!(doc.node(root).children(), snapshot.as_slice());
    }

    #[test]
    fn test_duplicate_declaration_degrades() {
        // Builder-time declare() rejects duplicates, so fabricate one at
        // the node level the way a buggy builder layer could.
        let mut doc = group_doc();
        let root = doc.root();
        let first = doc.create_node(NodeType::Group);
        doc.declare(first, "D").unwrap();
        doc.append_child(root, first).unwrap();

        let second = doc.create_node(NodeType::Group);
        doc.node_mut(second).declared_name = Some("D".to_string());
        doc.append_child(root, second).unwrap();

        resolve(&mut doc).unwrap();

        let children = doc.node(root).children();
        assert_eq!(children[0], first);
        let degraded = doc.node(children[1]);
        assert!(degraded.is_reference());
        assert_eq!(degraded.reference_name.as_deref(), Some("D"));
    }

    #[test]
    fn test_resolves_inside_field_slots() {
        // A reference stored in a single-node field (skinCoord) before the
        // declaration appears in a node-list field (skeleton subtree).
        let mut doc = group_doc();
        let root = doc.root();
        let humanoid = doc.create_node(NodeType::HAnimHumanoid);
        doc.append_child(root, humanoid).unwrap();

        let coord_use = doc.reference(NodeType::Coordinate, "skin_pts");
        doc.set_field(humanoid, "skinCoord", coord_use).unwrap();

        let joint = doc.create_node(NodeType::HAnimJoint);
        let coord_def = doc.create_node(NodeType::Coordinate);
        doc.declare(coord_def, "skin_pts").unwrap();
        doc.append_child(joint, coord_def).unwrap();
        doc.set_field(humanoid, "skeleton", FieldValue::NodeList(vec![joint])).unwrap();

        resolve(&mut doc).unwrap();

        // Declared node swapped into the skinCoord slot.
        match doc.node(humanoid).field("skinCoord").unwrap() {
            FieldValue::Node(h) => assert_eq!(*h, coord_def),
            _ => panic!("skinCoord is not a node field"),
        }
        // Joint child degraded to a reference.
        let joint_child = doc.node(doc.node(joint).children()[0]);
        assert!(joint_child.is_reference());
    }
}

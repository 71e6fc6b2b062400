//! Shared-node scene graph: typed fields, node arena, document registry,
//! and the declaration/reference resolver.
//!
//! - [`FieldValue`] / [`FieldKind`] - typed field containers
//! - [`NodeType`] - node vocabulary with per-type field schemas
//! - [`Node`] / [`NodeHandle`] / [`Document`] - arena-backed graph
//! - [`resolve`] - USE-before-DEF canonicalization pass

mod document;
mod field;
mod node;
mod resolver;
mod schema;

pub use document::Document;
pub use field::{FieldKind, FieldValue};
pub use node::{Node, NodeHandle};
pub use resolver::resolve;
pub use schema::{FieldSpec, NodeSpec, NodeType};

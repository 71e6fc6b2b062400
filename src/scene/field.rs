//! Typed field values.
//!
//! Every node field holds one of these variants. Which variant a given
//! field accepts is fixed by the node type's schema, not inferred at
//! runtime; multi-valued fields are ordered sequences whose index
//! positions map 1:1 to geometry indices, animation keys, and so on.

use glam::{Vec2, Vec3, Vec4};

use super::node::NodeHandle;
use crate::util::sanitize;

/// Value kinds a field can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    String,
    Vec2,
    Vec3,
    Vec4,
    Node,
    IntList,
    FloatList,
    StringList,
    Vec2List,
    Vec3List,
    Vec4List,
    NodeList,
}

impl FieldKind {
    /// Human-readable kind name for error reporting.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "Bool",
            FieldKind::Int => "Int",
            FieldKind::Float => "Float",
            FieldKind::String => "String",
            FieldKind::Vec2 => "Vec2",
            FieldKind::Vec3 => "Vec3",
            FieldKind::Vec4 => "Vec4",
            FieldKind::Node => "Node",
            FieldKind::IntList => "IntList",
            FieldKind::FloatList => "FloatList",
            FieldKind::StringList => "StringList",
            FieldKind::Vec2List => "Vec2List",
            FieldKind::Vec3List => "Vec3List",
            FieldKind::Vec4List => "Vec4List",
            FieldKind::NodeList => "NodeList",
        }
    }

    /// True for the node-valued kinds the resolver traverses into.
    pub fn is_structural(&self) -> bool {
        matches!(self, FieldKind::Node | FieldKind::NodeList)
    }
}

/// A field value: tagged union of scalars, vectors, strings, node
/// references and ordered lists thereof.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Node(NodeHandle),
    IntList(Vec<i32>),
    FloatList(Vec<f32>),
    StringList(Vec<String>),
    Vec2List(Vec<Vec2>),
    Vec3List(Vec<Vec3>),
    Vec4List(Vec<Vec4>),
    NodeList(Vec<NodeHandle>),
}

impl FieldValue {
    /// Kind tag of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Vec2(_) => FieldKind::Vec2,
            FieldValue::Vec3(_) => FieldKind::Vec3,
            FieldValue::Vec4(_) => FieldKind::Vec4,
            FieldValue::Node(_) => FieldKind::Node,
            FieldValue::IntList(_) => FieldKind::IntList,
            FieldValue::FloatList(_) => FieldKind::FloatList,
            FieldValue::StringList(_) => FieldKind::StringList,
            FieldValue::Vec2List(_) => FieldKind::Vec2List,
            FieldValue::Vec3List(_) => FieldKind::Vec3List,
            FieldValue::Vec4List(_) => FieldKind::Vec4List,
            FieldValue::NodeList(_) => FieldKind::NodeList,
        }
    }

    /// Clamp every float in the value to a finite number.
    ///
    /// Applied once when the value enters a field, so NaN/Infinity can
    /// never reach an encoder.
    pub fn sanitized(self) -> Self {
        match self {
            FieldValue::Float(v) => FieldValue::Float(sanitize(v)),
            FieldValue::Vec2(v) => FieldValue::Vec2(Vec2::new(sanitize(v.x), sanitize(v.y))),
            FieldValue::Vec3(v) => {
                FieldValue::Vec3(Vec3::new(sanitize(v.x), sanitize(v.y), sanitize(v.z)))
            }
            FieldValue::Vec4(v) => FieldValue::Vec4(Vec4::new(
                sanitize(v.x),
                sanitize(v.y),
                sanitize(v.z),
                sanitize(v.w),
            )),
            FieldValue::FloatList(vs) => {
                FieldValue::FloatList(vs.into_iter().map(sanitize).collect())
            }
            FieldValue::Vec2List(vs) => FieldValue::Vec2List(
                vs.into_iter()
                    .map(|v| Vec2::new(sanitize(v.x), sanitize(v.y)))
                    .collect(),
            ),
            FieldValue::Vec3List(vs) => FieldValue::Vec3List(
                vs.into_iter()
                    .map(|v| Vec3::new(sanitize(v.x), sanitize(v.y), sanitize(v.z)))
                    .collect(),
            ),
            FieldValue::Vec4List(vs) => FieldValue::Vec4List(
                vs.into_iter()
                    .map(|v| Vec4::new(sanitize(v.x), sanitize(v.y), sanitize(v.z), sanitize(v.w)))
                    .collect(),
            ),
            other => other,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<Vec2> for FieldValue {
    fn from(v: Vec2) -> Self {
        FieldValue::Vec2(v)
    }
}

impl From<Vec3> for FieldValue {
    fn from(v: Vec3) -> Self {
        FieldValue::Vec3(v)
    }
}

impl From<Vec4> for FieldValue {
    fn from(v: Vec4) -> Self {
        FieldValue::Vec4(v)
    }
}

impl From<NodeHandle> for FieldValue {
    fn from(v: NodeHandle) -> Self {
        FieldValue::Node(v)
    }
}

//! Tag/attribute encoding (XML).
//!
//! Scalar and vector fields become attributes, node-valued fields and
//! children become nested elements. A node nested in a non-default slot
//! carries a `containerField` attribute so the grammar stays reversible.

use crate::scene::{Document, FieldValue, NodeHandle};
use crate::util::Result;

use super::fmt::{fmt_f32, fmt_list, fmt_vec2, fmt_vec3, fmt_vec4};

const INDENT: &str = "  ";

/// Escape text for a single-quoted XML attribute.
fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Attribute text for a scalar/vector/list field value.
fn attr_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) => fmt_f32(*f),
        FieldValue::String(s) => escape_attr(s),
        FieldValue::Vec2(v) => fmt_vec2(*v),
        FieldValue::Vec3(v) => fmt_vec3(*v),
        FieldValue::Vec4(v) => fmt_vec4(*v),
        FieldValue::IntList(vs) => fmt_list(vs, |v| v.to_string()),
        FieldValue::FloatList(vs) => fmt_list(vs, |v| fmt_f32(*v)),
        FieldValue::StringList(vs) => vs
            .iter()
            .map(|s| format!("\"{}\"", escape_attr(s)))
            .collect::<Vec<_>>()
            .join(" "),
        FieldValue::Vec2List(vs) => fmt_list(vs, |v| fmt_vec2(*v)),
        FieldValue::Vec3List(vs) => fmt_list(vs, |v| fmt_vec3(*v)),
        FieldValue::Vec4List(vs) => fmt_list(vs, |v| fmt_vec4(*v)),
        FieldValue::Node(_) | FieldValue::NodeList(_) => unreachable!("structural field as attribute"),
    }
}

/// Write one element and its substructure.
///
/// `container` is the slot name the node sits in; `containerField` is
/// only spelled out when it differs from the node type's default.
pub(crate) fn write_element(
    out: &mut String,
    doc: &Document,
    handle: NodeHandle,
    depth: usize,
    container: &str,
) {
    let node = doc.node(handle);
    let element = node.node_type.element_name();

    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push('<');
    out.push_str(element);

    if let Some(name) = &node.reference_name {
        out.push_str(&format!(" USE='{}'", escape_attr(name)));
        if container != node.node_type.default_container() {
            out.push_str(&format!(" containerField='{container}'"));
        }
        out.push_str("/>\n");
        return;
    }

    if let Some(name) = &node.declared_name {
        out.push_str(&format!(" DEF='{}'", escape_attr(name)));
    }
    if container != node.node_type.default_container() {
        out.push_str(&format!(" containerField='{container}'"));
    }

    let mut nested: Vec<(&'static str, Vec<NodeHandle>)> = Vec::new();
    for (name, value) in node.fields() {
        match value {
            FieldValue::Node(h) => nested.push((name, vec![*h])),
            FieldValue::NodeList(hs) => nested.push((name, hs.clone())),
            scalar => out.push_str(&format!(" {}='{}'", name, attr_value(scalar))),
        }
    }

    if nested.is_empty() && node.children().is_empty() {
        out.push_str("/>\n");
        return;
    }

    out.push_str(">\n");
    for (slot, handles) in nested {
        for h in handles {
            write_element(out, doc, h, depth + 1, slot);
        }
    }
    for &child in node.children() {
        write_element(out, doc, child, depth + 1, "children");
    }
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(&format!("</{element}>\n"));
}

/// Encode a resolved document as an XML file body.
pub fn encode(doc: &Document) -> Result<String> {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<!DOCTYPE X3D PUBLIC \"ISO//Web3D//DTD X3D 4.0//EN\" \
         \"https://www.web3d.org/specifications/x3d-4.0.dtd\">\n",
    );
    let root = doc.root();
    let container = doc.node(root).node_type.default_container();
    write_element(&mut out, doc, root, 0, container);
    Ok(out)
}

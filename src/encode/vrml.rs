//! Token-stream encoding (Classic VRML).
//!
//! `DEF name Type { field value ... }` blocks, `USE name` references,
//! bracketed multi-value runs. The file header carries the profile and
//! the head metas as `META` statements; routes are `ROUTE` statements.

use crate::scene::{Document, FieldValue, Node, NodeHandle, NodeType};
use crate::util::Result;

use super::fmt::{fmt_f32, fmt_vec2, fmt_vec3, fmt_vec4};

const INDENT: &str = "  ";

/// Escape a VRML string literal body.
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

fn string_field(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// Inline token run for a scalar/vector/list field value.
fn field_tokens(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        FieldValue::Int(i) => i.to_string(),
        FieldValue::Float(f) => fmt_f32(*f),
        FieldValue::String(s) => string_field(s),
        FieldValue::Vec2(v) => fmt_vec2(*v),
        FieldValue::Vec3(v) => fmt_vec3(*v),
        FieldValue::Vec4(v) => fmt_vec4(*v),
        FieldValue::IntList(vs) => format!(
            "[ {} ]",
            vs.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
        ),
        FieldValue::FloatList(vs) => format!(
            "[ {} ]",
            vs.iter().map(|v| fmt_f32(*v)).collect::<Vec<_>>().join(" ")
        ),
        FieldValue::StringList(vs) => format!(
            "[ {} ]",
            vs.iter().map(|s| string_field(s)).collect::<Vec<_>>().join(" ")
        ),
        FieldValue::Vec2List(vs) => format!(
            "[ {} ]",
            vs.iter().map(|v| fmt_vec2(*v)).collect::<Vec<_>>().join(", ")
        ),
        FieldValue::Vec3List(vs) => format!(
            "[ {} ]",
            vs.iter().map(|v| fmt_vec3(*v)).collect::<Vec<_>>().join(", ")
        ),
        FieldValue::Vec4List(vs) => format!(
            "[ {} ]",
            vs.iter().map(|v| fmt_vec4(*v)).collect::<Vec<_>>().join(", ")
        ),
        FieldValue::Node(_) | FieldValue::NodeList(_) => unreachable!("structural field as tokens"),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// `ROUTE from.field TO to.field` statement form.
fn write_route(out: &mut String, node: &Node, depth: usize) {
    let get = |name: &str| match node.field(name) {
        Some(FieldValue::String(s)) => s.clone(),
        _ => String::new(),
    };
    push_indent(out, depth);
    out.push_str(&format!(
        "ROUTE {}.{} TO {}.{}\n",
        get("fromNode"),
        get("fromField"),
        get("toNode"),
        get("toField")
    ));
}

fn write_node(out: &mut String, doc: &Document, handle: NodeHandle, depth: usize) {
    let node = doc.node(handle);

    if let Some(name) = &node.reference_name {
        push_indent(out, depth);
        out.push_str(&format!("USE {name}\n"));
        return;
    }
    if node.node_type == NodeType::Route {
        write_route(out, node, depth);
        return;
    }

    push_indent(out, depth);
    if let Some(name) = &node.declared_name {
        out.push_str(&format!("DEF {name} "));
    }
    out.push_str(node.node_type.element_name());
    out.push_str(" {\n");

    for (name, value) in node.fields() {
        match value {
            FieldValue::Node(h) => {
                push_indent(out, depth + 1);
                out.push_str(name);
                out.push('\n');
                write_node(out, doc, *h, depth + 2);
            }
            FieldValue::NodeList(hs) => {
                push_indent(out, depth + 1);
                out.push_str(name);
                out.push_str(" [\n");
                for h in hs {
                    write_node(out, doc, *h, depth + 2);
                }
                push_indent(out, depth + 1);
                out.push_str("]\n");
            }
            scalar => {
                push_indent(out, depth + 1);
                out.push_str(&format!("{} {}\n", name, field_tokens(scalar)));
            }
        }
    }

    if !node.children().is_empty() {
        push_indent(out, depth + 1);
        out.push_str("children [\n");
        for &child in node.children() {
            write_node(out, doc, child, depth + 2);
        }
        push_indent(out, depth + 1);
        out.push_str("]\n");
    }

    push_indent(out, depth);
    out.push_str("}\n");
}

/// Encode a resolved document as a Classic VRML file body.
pub fn encode(doc: &Document) -> Result<String> {
    let mut out = String::new();
    out.push_str("#X3D V4.0 utf8\n");

    let root = doc.node(doc.root());
    let profile = match root.field("profile") {
        Some(FieldValue::String(p)) => p.as_str(),
        _ => "Immersive",
    };
    out.push_str(&format!("PROFILE {profile}\n"));

    // head metas become META statements.
    if let Some(FieldValue::Node(head)) = root.field("head") {
        for &meta in doc.node(*head).children() {
            let meta = doc.node(meta);
            if let (Some(FieldValue::String(name)), Some(FieldValue::String(content))) =
                (meta.field("name"), meta.field("content"))
            {
                out.push_str(&format!(
                    "META {} {}\n",
                    string_field(name),
                    string_field(content)
                ));
            }
        }
    }
    out.push('\n');

    // Scene children are written at top level.
    if let Some(FieldValue::Node(scene)) = root.field("Scene") {
        for &child in doc.node(*scene).children() {
            write_node(&mut out, doc, child, 0);
        }
    } else {
        write_node(&mut out, doc, doc.root(), 0);
    }

    Ok(out)
}

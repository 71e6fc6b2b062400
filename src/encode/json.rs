//! Key/value encoding (JSON).
//!
//! Follows the X3D JSON conventions: attribute fields get `@`-prefixed
//! keys, node-valued fields get `-`-prefixed keys wrapping a
//! `{"TypeName": {...}}` object, multi-value fields flatten into arrays.
//! Built on `serde_json` values, serialized pretty.

use serde_json::{json, Map, Number, Value};

use crate::scene::{Document, FieldValue, NodeHandle, NodeType};
use crate::util::Result;

use super::fmt::json_f64;

fn number(v: f32) -> Value {
    // Sanitized fields are always finite, so from_f64 cannot fail.
    Number::from_f64(json_f64(v)).map(Value::Number).unwrap_or(Value::Null)
}

/// Scalar/vector/list field as a JSON value; vectors flatten.
fn field_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Bool(b) => json!(b),
        FieldValue::Int(i) => json!(i),
        FieldValue::Float(f) => number(*f),
        FieldValue::String(s) => json!(s),
        FieldValue::Vec2(v) => Value::Array(vec![number(v.x), number(v.y)]),
        FieldValue::Vec3(v) => Value::Array(vec![number(v.x), number(v.y), number(v.z)]),
        FieldValue::Vec4(v) => {
            Value::Array(vec![number(v.x), number(v.y), number(v.z), number(v.w)])
        }
        FieldValue::IntList(vs) => Value::Array(vs.iter().map(|v| json!(v)).collect()),
        FieldValue::FloatList(vs) => Value::Array(vs.iter().map(|v| number(*v)).collect()),
        FieldValue::StringList(vs) => Value::Array(vs.iter().map(|s| json!(s)).collect()),
        FieldValue::Vec2List(vs) => Value::Array(
            vs.iter().flat_map(|v| [number(v.x), number(v.y)]).collect(),
        ),
        FieldValue::Vec3List(vs) => Value::Array(
            vs.iter()
                .flat_map(|v| [number(v.x), number(v.y), number(v.z)])
                .collect(),
        ),
        FieldValue::Vec4List(vs) => Value::Array(
            vs.iter()
                .flat_map(|v| [number(v.x), number(v.y), number(v.z), number(v.w)])
                .collect(),
        ),
        FieldValue::Node(_) | FieldValue::NodeList(_) => unreachable!("structural field as value"),
    }
}

/// Wrap a node's body object under its element name.
fn wrapped(doc: &Document, handle: NodeHandle) -> Value {
    let element = doc.node(handle).node_type.element_name();
    let mut map = Map::new();
    map.insert(element.to_string(), node_body(doc, handle));
    Value::Object(map)
}

/// Body object of a node: `@` attributes, `-` node fields, `-children`.
fn node_body(doc: &Document, handle: NodeHandle) -> Value {
    let node = doc.node(handle);
    let mut body = Map::new();

    if let Some(name) = &node.reference_name {
        body.insert("@USE".to_string(), json!(name));
        return Value::Object(body);
    }
    if let Some(name) = &node.declared_name {
        body.insert("@DEF".to_string(), json!(name));
    }

    for (name, value) in node.fields() {
        match value {
            FieldValue::Node(h) => {
                body.insert(format!("-{name}"), wrapped(doc, *h));
            }
            FieldValue::NodeList(hs) => {
                body.insert(
                    format!("-{name}"),
                    Value::Array(hs.iter().map(|&h| wrapped(doc, h)).collect()),
                );
            }
            scalar => {
                body.insert(format!("@{name}"), field_value(scalar));
            }
        }
    }

    if !node.children().is_empty() {
        body.insert(
            "-children".to_string(),
            Value::Array(node.children().iter().map(|&h| wrapped(doc, h)).collect()),
        );
    }

    Value::Object(body)
}

/// Encode a resolved document as a JSON file body.
pub fn encode(doc: &Document) -> Result<String> {
    let root = doc.node(doc.root());

    let value = if root.node_type == NodeType::X3D {
        // Document wrapper: head metas and the Scene get their canonical
        // unprefixed keys.
        let mut x3d = Map::new();
        x3d.insert("encoding".to_string(), json!("UTF-8"));
        for (name, value) in root.fields() {
            match (name, value) {
                ("head", FieldValue::Node(head)) => {
                    let metas: Vec<Value> = doc
                        .node(*head)
                        .children()
                        .iter()
                        .map(|&m| node_body(doc, m))
                        .collect();
                    x3d.insert("head".to_string(), json!({ "meta": metas }));
                }
                ("Scene", FieldValue::Node(scene)) => {
                    x3d.insert("Scene".to_string(), node_body(doc, *scene));
                }
                (_, scalar) => {
                    x3d.insert(format!("@{name}"), field_value(scalar));
                }
            }
        }
        json!({ "X3D": Value::Object(x3d) })
    } else {
        wrapped(doc, doc.root())
    };

    let mut out = serde_json::to_string_pretty(&value).expect("document serializes");
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_attribute_and_node_keys() {
        let mut doc = Document::with_root(NodeType::Scene);
        let shape = doc.create_node(NodeType::Shape);
        let appr = doc.create_node(NodeType::Appearance);
        let mat = doc.create_node(NodeType::Material);
        doc.set_field(mat, "diffuseColor", Vec3::new(0.5, 0.25, 1.0)).unwrap();
        doc.declare(mat, "MA_Red").unwrap();
        doc.set_field(appr, "material", mat).unwrap();
        doc.set_field(shape, "appearance", appr).unwrap();
        doc.append_child(doc.root(), shape).unwrap();

        let out = encode(&doc).unwrap();
        assert!(out.contains("\"-appearance\""));
        assert!(out.contains("\"-material\""));
        assert!(out.contains("\"@DEF\": \"MA_Red\""));
        assert!(out.contains("\"@diffuseColor\""));
    }

    #[test]
    fn test_use_key() {
        let mut doc = Document::with_root(NodeType::Scene);
        let root = doc.root();
        let g = doc.create_node(NodeType::Group);
        doc.declare(g, "grp").unwrap();
        doc.append_child(root, g).unwrap();
        let u = doc.reference(NodeType::Group, "grp");
        doc.append_child(root, u).unwrap();

        let out = encode(&doc).unwrap();
        assert!(out.contains("\"@USE\": \"grp\""));
    }

    #[test]
    fn test_vec_lists_flatten() {
        let mut doc = Document::with_root(NodeType::Scene);
        let coord = doc.create_node(NodeType::Coordinate);
        doc.set_field(
            coord,
            "point",
            FieldValue::Vec3List(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]),
        )
        .unwrap();
        let ifs = doc.create_node(NodeType::IndexedFaceSet);
        doc.set_field(ifs, "coord", coord).unwrap();
        let shape = doc.create_node(NodeType::Shape);
        doc.set_field(shape, "geometry", ifs).unwrap();
        doc.append_child(doc.root(), shape).unwrap();

        let out = encode(&doc).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        let point = &parsed["Scene"]["-children"][0]["Shape"]["-geometry"]["IndexedFaceSet"]
            ["-coord"]["Coordinate"]["@point"];
        assert_eq!(point.as_array().unwrap().len(), 6);
    }
}

//! Wrapped-token encoding (HTML page embedding the element tree).
//!
//! The scene is rendered with the tag/attribute grammar, minus the XML
//! prolog, inside an HTML shell that loads the x3dom runtime, so the
//! exported file is directly viewable in a browser.

use crate::scene::{Document, FieldValue};
use crate::util::Result;

use super::xml::write_element;

const X3DOM_SCRIPT: &str = "https://www.x3dom.org/download/x3dom.js";
const X3DOM_CSS: &str = "https://www.x3dom.org/download/x3dom.css";

/// Escape text content for HTML.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page title: the filename meta when present.
fn page_title(doc: &Document) -> String {
    let root = doc.node(doc.root());
    if let Some(FieldValue::Node(head)) = root.field("head") {
        for &meta in doc.node(*head).children() {
            let meta = doc.node(meta);
            if let (Some(FieldValue::String(name)), Some(FieldValue::String(content))) =
                (meta.field("name"), meta.field("content"))
            {
                if name == "filename" || name == "title" {
                    return content.clone();
                }
            }
        }
    }
    "Scene".to_string()
}

/// Encode a resolved document as an HTML page body.
pub fn encode(doc: &Document) -> Result<String> {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\"/>\n");
    out.push_str(&format!("<title>{}</title>\n", escape_text(&page_title(doc))));
    out.push_str(&format!("<script type='text/javascript' src='{X3DOM_SCRIPT}'></script>\n"));
    out.push_str(&format!("<link rel='stylesheet' type='text/css' href='{X3DOM_CSS}'/>\n"));
    out.push_str("</head>\n<body>\n");
    let root = doc.root();
    let container = doc.node(root).node_type.default_container();
    write_element(&mut out, doc, root, 0, container);
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeType;

    #[test]
    fn test_shell_and_embedded_scene() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.set_field(root, "profile", "Immersive").unwrap();
        let head = doc.create_node(NodeType::Head);
        let meta = doc.create_node(NodeType::Meta);
        doc.set_field(meta, "name", "filename").unwrap();
        doc.set_field(meta, "content", "cube.html").unwrap();
        doc.append_child(head, meta).unwrap();
        doc.set_field(root, "head", head).unwrap();
        let scene = doc.create_node(NodeType::Scene);
        doc.set_field(root, "Scene", scene).unwrap();

        let out = encode(&doc).unwrap();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>cube.html</title>"));
        assert!(out.contains("x3dom.js"));
        assert!(out.contains("<X3D profile='Immersive'"));
        assert!(!out.contains("<?xml"));
    }
}

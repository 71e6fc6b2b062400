use glam::Vec3;

use super::*;
use crate::scene::{resolve, Document, NodeType};

/// Small scene with a declared transform, a reference to it, and a
/// not-perfectly-representable float.
fn sample_doc() -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    doc.set_field(root, "profile", "Immersive").unwrap();
    doc.set_field(root, "version", "4.0").unwrap();

    let head = doc.create_node(NodeType::Head);
    let meta = doc.create_node(NodeType::Meta);
    doc.set_field(meta, "name", "filename").unwrap();
    doc.set_field(meta, "content", "sample.x3d").unwrap();
    doc.append_child(head, meta).unwrap();
    doc.set_field(root, "head", head).unwrap();

    let scene = doc.create_node(NodeType::Scene);
    doc.set_field(root, "Scene", scene).unwrap();

    let t = doc.create_node(NodeType::Transform);
    doc.set_field(t, "translation", Vec3::new(1.234_567_9, -0.5, 0.0)).unwrap();
    doc.declare(t, "OB_Cube_TRANSFORM").unwrap();
    doc.append_child(scene, t).unwrap();

    let u = doc.reference(NodeType::Transform, "OB_Cube_TRANSFORM");
    doc.append_child(scene, u).unwrap();

    resolve(&mut doc).unwrap();
    doc
}

#[test]
fn test_encoding_is_deterministic() {
    let doc = sample_doc();
    for format in [Format::Xml, Format::Vrml, Format::Json, Format::Html] {
        let a = encode(&doc, format).unwrap();
        let b = encode(&doc, format).unwrap();
        assert_eq!(a, b, "{format} output differs between runs");
    }
}

#[test]
fn test_reference_serializes_as_use_everywhere() {
    let doc = sample_doc();
    assert!(encode(&doc, Format::Xml).unwrap().contains("USE='OB_Cube_TRANSFORM'"));
    assert!(encode(&doc, Format::Vrml).unwrap().contains("USE OB_Cube_TRANSFORM"));
    assert!(encode(&doc, Format::Json).unwrap().contains("\"@USE\": \"OB_Cube_TRANSFORM\""));
    assert!(encode(&doc, Format::Html).unwrap().contains("USE='OB_Cube_TRANSFORM'"));
}

#[test]
fn test_numeric_agreement_across_formats() {
    let doc = sample_doc();

    // The rounded x component all encoders must agree on.
    let expected = crate::util::round_to_precision(1.234_567_9);

    let xml = encode(&doc, Format::Xml).unwrap();
    let attr = xml.split("translation='").nth(1).unwrap();
    let xml_x: f32 = attr.split_whitespace().next().unwrap().parse().unwrap();

    let vrml = encode(&doc, Format::Vrml).unwrap();
    let run = vrml.split("translation ").nth(1).unwrap();
    let vrml_x: f32 = run.split_whitespace().next().unwrap().parse().unwrap();

    let json = encode(&doc, Format::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let json_x = parsed["X3D"]["Scene"]["-children"][0]["Transform"]["@translation"][0]
        .as_f64()
        .unwrap() as f32;

    for (label, got) in [("xml", xml_x), ("vrml", vrml_x), ("json", json_x)] {
        assert!(
            (got - expected).abs() < 1e-5,
            "{label} disagrees: {got} vs {expected}"
        );
    }
}

#[test]
fn test_format_extensions() {
    assert_eq!(Format::Xml.extension(), "x3d");
    assert_eq!(Format::from_extension("X3DV").unwrap(), Format::Vrml);
    assert_eq!(Format::from_extension("json").unwrap(), Format::Json);
    let err = Format::from_extension("gltf").unwrap_err();
    assert!(matches!(err, crate::util::Error::UnsupportedFormat(ext) if ext == "gltf"));
}

#[test]
fn test_info_vocabulary_elements() {
    let mut doc = Document::with_root(NodeType::Scene);
    let wi = doc.create_node(NodeType::WorldInfo);
    doc.set_field(wi, "title", "demo").unwrap();
    doc.append_child(doc.root(), wi).unwrap();
    let seg = doc.create_node(NodeType::HAnimSegment);
    doc.set_field(seg, "name", "torso").unwrap();
    doc.append_child(doc.root(), seg).unwrap();

    let out = encode(&doc, Format::Xml).unwrap();
    assert!(out.contains("<WorldInfo title='demo'/>"));
    assert!(out.contains("<HAnimSegment name='torso'/>"));
}

#[test]
fn test_vrml_header_and_meta() {
    let doc = sample_doc();
    let out = encode(&doc, Format::Vrml).unwrap();
    assert!(out.starts_with("#X3D V4.0 utf8\n"));
    assert!(out.contains("PROFILE Immersive"));
    assert!(out.contains("META \"filename\" \"sample.x3d\""));
}

#[test]
fn test_xml_prolog_and_doctype() {
    let doc = sample_doc();
    let out = encode(&doc, Format::Xml).unwrap();
    assert!(out.starts_with("<?xml version=\"1.0\""));
    assert!(out.contains("<!DOCTYPE X3D"));
    assert!(out.contains("<X3D profile='Immersive' version='4.0'>"));
}

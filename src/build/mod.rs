//! Scene assembly: one call tree builds the whole document as nodes.
//!
//! Builders take already-extracted collaborator data (see
//! [`scene_data`]), thread the per-export [`ExportContext`] through every
//! call, and leave reference resolution to the scene module's resolver.

mod context;
mod geometry;
mod humanoid;
mod interpolators;
mod material;
mod objects;
pub mod scene_data;

pub use context::{ExportContext, ExportSettings, Namespace};
pub use scene_data::{
    CameraData, HumanoidData, ImageData, JointData, KeyframeTrack, LightData, LightKind,
    MaterialData, MaterialSlot, MeshObject, MistData, MotionData, ObjectBody, SceneData,
    SceneObject, SiteData, TextureTransformData, WorldData,
};

use glam::Mat4;
use tracing::debug;

use crate::scene::{Document, NodeHandle, NodeType};
use crate::util::Result;

fn contains_light(objects: &[SceneObject]) -> bool {
    objects.iter().any(|o| {
        matches!(o.body, ObjectBody::Light(_)) || contains_light(&o.children)
    })
}

/// Build the body node of one object, if it produces any.
fn body_node(
    doc: &mut Document,
    ctx: &mut ExportContext,
    scene: &SceneData,
    obj: &SceneObject,
    matrix: &Mat4,
) -> Result<Option<NodeHandle>> {
    match &obj.body {
        ObjectBody::Empty => Ok(None),
        ObjectBody::Mesh(mesh_obj) => geometry::mesh_shapes(
            doc, ctx, scene, &obj.name, mesh_obj, matrix, obj.collision,
        ),
        ObjectBody::Light(data) => {
            objects::light(doc, ctx, &obj.name, matrix, data).map(Some)
        }
        ObjectBody::Camera(data) => {
            objects::viewpoint(doc, ctx, &obj.name, matrix, data).map(Some)
        }
        ObjectBody::Armature(data) => humanoid::humanoid(doc, data).map(Some),
    }
}

/// Build one object (and its children) into `out`.
///
/// With hierarchy enabled each object gets a declared transform holding
/// its local matrix and nests its children; without it, world matrices
/// are accumulated and objects flatten into siblings.
fn build_object(
    doc: &mut Document,
    ctx: &mut ExportContext,
    scene: &SceneData,
    obj: &SceneObject,
    parent_matrix: &Mat4,
    out: &mut Vec<NodeHandle>,
) -> Result<()> {
    if ctx.settings.use_hierarchy {
        let obj_id = ctx.unique_name(Namespace::Plain, format!("objtr:{}", obj.name), &obj.name);
        let trans = objects::transform(doc, &obj.matrix, Some(format!("{obj_id}_TRANSFORM")))?;

        if let Some(body) = body_node(doc, ctx, scene, obj, &Mat4::IDENTITY)? {
            doc.append_child(trans, body)?;
        }
        let mut nested = Vec::new();
        for child in &obj.children {
            build_object(doc, ctx, scene, child, &Mat4::IDENTITY, &mut nested)?;
        }
        for node in nested {
            doc.append_child(trans, node)?;
        }
        out.push(trans);
    } else {
        let world_matrix = *parent_matrix * obj.matrix;
        if let Some(body) = body_node(doc, ctx, scene, obj, &world_matrix)? {
            out.push(body);
        }
        for child in &obj.children {
            build_object(doc, ctx, scene, child, &world_matrix, out)?;
        }
    }
    Ok(())
}

/// Assemble the full document for a scene.
///
/// The returned document is unresolved; the caller runs the resolver
/// before encoding.
pub fn build_document(scene: &SceneData, ctx: &mut ExportContext) -> Result<Document> {
    let mut doc = Document::new();
    let root = doc.root();
    doc.set_field(root, "profile", "Immersive")?;
    doc.set_field(root, "version", "4.0")?;

    let head = objects::header(&mut doc, ctx)?;
    doc.set_field(root, "head", head)?;

    let scene_node = doc.create_node(NodeType::Scene);
    doc.set_field(root, "Scene", scene_node)?;

    let nav = objects::navigation_info(&mut doc, contains_light(&scene.objects))?;
    doc.append_child(scene_node, nav)?;

    if let Some(world) = &scene.world {
        let bg = objects::background(&mut doc, ctx, world)?;
        doc.append_child(scene_node, bg)?;
        if let Some(fog) = objects::fog(&mut doc, world)? {
            doc.append_child(scene_node, fog)?;
        }
    }

    let mut nodes = Vec::new();
    for obj in &scene.objects {
        build_object(&mut doc, ctx, scene, obj, &Mat4::IDENTITY, &mut nodes)?;
    }
    for node in nodes {
        doc.append_child(scene_node, node)?;
    }

    for track in &scene.animations {
        for node in interpolators::animation_nodes(&mut doc, track)? {
            doc.append_child(scene_node, node)?;
        }
    }

    debug!(nodes = doc.len(), objects = scene.objects.len(), "document assembled");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::FieldValue;
    use glam::Vec3;

    fn light_object(name: &str) -> SceneObject {
        SceneObject {
            name: name.to_string(),
            matrix: Mat4::IDENTITY,
            body: ObjectBody::Light(LightData {
                kind: LightKind::Point,
                color: Vec3::ONE,
                energy: 1.0,
                distance: 30.0,
            }),
            children: Vec::new(),
            collision: false,
        }
    }

    #[test]
    fn test_headlight_follows_scene_lights() {
        let mut ctx = ExportContext::new(ExportSettings::default());
        let scene = SceneData { objects: vec![light_object("Lamp")], ..Default::default() };
        let doc = build_document(&scene, &mut ctx).unwrap();

        let root = doc.node(doc.root());
        let FieldValue::Node(scene_node) = root.field("Scene").unwrap() else { panic!() };
        let nav = doc.node(doc.node(*scene_node).children()[0]);
        assert_eq!(nav.node_type, NodeType::NavigationInfo);
        assert_eq!(nav.field("headlight"), Some(&FieldValue::Bool(true)));
    }

    #[test]
    fn test_hierarchy_nests_children() {
        let mut ctx = ExportContext::new(ExportSettings::default());
        let mut parent = SceneObject::empty("Parent", Mat4::IDENTITY);
        parent.children.push(light_object("Child"));
        let scene = SceneData { objects: vec![parent], ..Default::default() };
        let doc = build_document(&scene, &mut ctx).unwrap();

        let root = doc.node(doc.root());
        let FieldValue::Node(scene_node) = root.field("Scene").unwrap() else { panic!() };
        // NavigationInfo, then the parent transform.
        let trans = doc.node(doc.node(*scene_node).children()[1]);
        assert_eq!(trans.declared_name.as_deref(), Some("Parent_TRANSFORM"));
        let child_trans = doc.node(trans.children()[0]);
        assert_eq!(child_trans.declared_name.as_deref(), Some("Child_TRANSFORM"));
    }

    #[test]
    fn test_flat_mode_accumulates_matrices() {
        let mut ctx = ExportContext::new(ExportSettings {
            use_hierarchy: false,
            ..Default::default()
        });
        let mut parent = SceneObject::empty("Parent", Mat4::from_translation(Vec3::X));
        let mut child = light_object("Child");
        child.matrix = Mat4::from_translation(Vec3::Y);
        parent.children.push(child);
        let scene = SceneData { objects: vec![parent], ..Default::default() };
        let doc = build_document(&scene, &mut ctx).unwrap();

        let root = doc.node(doc.root());
        let FieldValue::Node(scene_node) = root.field("Scene").unwrap() else { panic!() };
        let lite = doc.node(doc.node(*scene_node).children()[1]);
        assert_eq!(lite.node_type, NodeType::PointLight);
        assert_eq!(
            lite.field("location"),
            Some(&FieldValue::Vec3(Vec3::new(1.0, 1.0, 0.0)))
        );
    }
}

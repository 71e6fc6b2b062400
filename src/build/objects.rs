//! Builders for non-geometry scene nodes: header metadata, navigation,
//! background, fog, viewpoints, transforms and lights.

use glam::Mat4;

use crate::scene::{Document, FieldValue, NodeHandle, NodeType};
use crate::util::{clamp_color3, matrix_direction_neg_z, matrix_to_axis_angle, Result};

use super::context::{ExportContext, Namespace};
use super::scene_data::{CameraData, LightData, LightKind, MistData, WorldData};

/// Intensity conversion from light energy, capped at 1.
fn light_intensity(energy: f32) -> f32 {
    (energy / 1.75).min(1.0)
}

/// Build the document head with exporter metadata.
pub fn header(doc: &mut Document, ctx: &ExportContext) -> Result<NodeHandle> {
    let head = doc.create_node(NodeType::Head);
    let entries = [
        ("filename", ctx.settings.filename.clone()),
        ("copyright", ctx.settings.copyright.clone()),
        ("reference", "http://www.web3D.org".to_string()),
        ("generator", format!("x3dv {}", env!("CARGO_PKG_VERSION"))),
        ("exporter", "x3dv".to_string()),
    ];
    for (name, content) in entries {
        let meta = doc.create_node(NodeType::Meta);
        doc.set_field(meta, "name", name)?;
        doc.set_field(meta, "content", content)?;
        doc.append_child(head, meta)?;
    }
    Ok(head)
}

/// NavigationInfo; headlight tracks whether the scene carries lights.
pub fn navigation_info(doc: &mut Document, has_light: bool) -> Result<NodeHandle> {
    let ni = doc.create_node(NodeType::NavigationInfo);
    doc.set_field(ni, "headlight", has_light)?;
    doc.set_field(ni, "visibilityLimit", 0.0f32)?;
    Ok(ni)
}

/// Background from the world's horizon color.
pub fn background(
    doc: &mut Document,
    ctx: &mut ExportContext,
    world: &WorldData,
) -> Result<NodeHandle> {
    let world_id = ctx.unique_name(Namespace::World, format!("world:{}", world.name), &world.name);
    let bg = doc.create_node(NodeType::Background);
    doc.declare(bg, world_id)?;
    let color = clamp_color3(world.color);
    doc.set_field(bg, "skyColor", FieldValue::Vec3List(vec![color]))?;
    doc.set_field(bg, "groundColor", FieldValue::Vec3List(vec![color]))?;
    Ok(bg)
}

/// Fog from mist settings; None when mist is disabled.
pub fn fog(doc: &mut Document, world: &WorldData) -> Result<Option<NodeHandle>> {
    let Some(MistData { linear, depth }) = world.mist else {
        return Ok(None);
    };
    let fog = doc.create_node(NodeType::Fog);
    doc.set_field(fog, "fogType", if linear { "LINEAR" } else { "EXPONENTIAL" })?;
    doc.set_field(fog, "color", clamp_color3(world.color))?;
    doc.set_field(fog, "visibilityRange", depth)?;
    Ok(Some(fog))
}

/// Viewpoint from a camera object.
pub fn viewpoint(
    doc: &mut Document,
    ctx: &mut ExportContext,
    name: &str,
    matrix: &Mat4,
    camera: &CameraData,
) -> Result<NodeHandle> {
    let view_id = ctx.unique_name(Namespace::Camera, format!("view:{name}"), name);
    let (_, rotation, translation) = matrix.to_scale_rotation_translation();
    let (axis, angle) = rotation.to_axis_angle();
    let axis = axis.normalize_or_zero();

    let vp = doc.create_node(NodeType::Viewpoint);
    doc.declare(vp, view_id)?;
    doc.set_field(vp, "position", translation)?;
    doc.set_field(vp, "orientation", axis.extend(angle))?;
    doc.set_field(vp, "fieldOfView", camera.angle)?;
    Ok(vp)
}

/// Transform node from a decomposed matrix, optionally declared.
pub fn transform(
    doc: &mut Document,
    matrix: &Mat4,
    def_id: Option<String>,
) -> Result<NodeHandle> {
    let (scale, _, translation) = matrix.to_scale_rotation_translation();
    let (axis, angle) = matrix_to_axis_angle(matrix);

    let trans = doc.create_node(NodeType::Transform);
    if let Some(id) = def_id {
        doc.declare(trans, id)?;
    }
    doc.set_field(trans, "translation", translation)?;
    doc.set_field(trans, "scale", scale)?;
    doc.set_field(trans, "rotation", axis.extend(angle))?;
    Ok(trans)
}

/// Light node of the kind matching the collaborator data.
pub fn light(
    doc: &mut Document,
    ctx: &mut ExportContext,
    name: &str,
    matrix: &Mat4,
    data: &LightData,
) -> Result<NodeHandle> {
    let light_id = ctx.unique_name(Namespace::Light, format!("light:{name}"), name);
    let color = clamp_color3(data.color);
    let intensity = light_intensity(data.energy);
    let location = matrix.to_scale_rotation_translation().2;

    let node = match data.kind {
        LightKind::Point => {
            let lite = doc.create_node(NodeType::PointLight);
            doc.declare(lite, light_id)?;
            doc.set_field(lite, "radius", data.distance)?;
            doc.set_field(lite, "location", location)?;
            lite
        }
        LightKind::Spot { spot_size } => {
            // Cone aperture to beam width plus a wider falloff cutoff.
            let beam_width = spot_size * 0.37;
            let cut_off_angle = beam_width * 1.3;
            let radius = data.distance * beam_width.cos();

            let lite = doc.create_node(NodeType::SpotLight);
            doc.declare(lite, light_id)?;
            doc.set_field(lite, "radius", radius)?;
            doc.set_field(lite, "beamWidth", beam_width)?;
            doc.set_field(lite, "cutOffAngle", cut_off_angle)?;
            doc.set_field(lite, "direction", matrix_direction_neg_z(matrix))?;
            doc.set_field(lite, "location", location)?;
            lite
        }
        LightKind::Directional => {
            let lite = doc.create_node(NodeType::DirectionalLight);
            doc.declare(lite, light_id)?;
            doc.set_field(lite, "direction", matrix_direction_neg_z(matrix))?;
            lite
        }
    };

    doc.set_field(node, "ambientIntensity", 0.0f32)?;
    doc.set_field(node, "intensity", intensity)?;
    doc.set_field(node, "color", color)?;
    Ok(node)
}

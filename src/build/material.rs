//! Material and texture builders.
//!
//! A material or image datablock is declared on first use and referenced
//! by name afterwards; the per-export context tracks what has been
//! emitted.

use glam::Vec3;

use crate::scene::{Document, FieldValue, NodeHandle, NodeType};
use crate::util::{clamp_color3, Result};

use super::context::{ExportContext, Namespace};
use super::scene_data::{ImageData, MaterialData, TextureTransformData};

/// Material node, DEF on first use and USE afterwards.
pub fn material(
    doc: &mut Document,
    ctx: &mut ExportContext,
    index: usize,
    data: &MaterialData,
) -> Result<NodeHandle> {
    let material_id = ctx.unique_name(Namespace::Material, format!("material:{index}"), &data.name);

    if ctx.materials_seen.contains_key(&index) {
        return Ok(doc.reference(NodeType::Material, material_id));
    }
    ctx.materials_seen.insert(index, material_id.clone());

    let diffuse = Vec3::new(data.diffuse.x, data.diffuse.y, data.diffuse.z);
    let shininess = data.specular_intensity;
    let spec_scale = 1.25 / (data.specular_intensity + 0.001);
    let specular = Vec3::new(
        (data.specular_color.x + 0.001) / spec_scale,
        (data.specular_color.y + 0.001) / spec_scale,
        (data.specular_color.z + 0.001) / spec_scale,
    );
    let transparency = 1.0 - data.diffuse.w;

    let mat = doc.create_node(NodeType::Material);
    doc.declare(mat, material_id)?;
    doc.set_field(mat, "diffuseColor", clamp_color3(diffuse))?;
    doc.set_field(mat, "specularColor", clamp_color3(specular))?;
    doc.set_field(mat, "emissiveColor", Vec3::ZERO)?;
    doc.set_field(mat, "ambientIntensity", 0.0f32)?;
    doc.set_field(mat, "shininess", shininess)?;
    doc.set_field(mat, "transparency", transparency)?;
    Ok(mat)
}

/// ImageTexture node, DEF on first use and USE afterwards.
pub fn image_texture(
    doc: &mut Document,
    ctx: &mut ExportContext,
    index: usize,
    data: &ImageData,
) -> Result<NodeHandle> {
    let image_id = ctx.unique_name(Namespace::Image, format!("image:{index}"), &data.name);

    if ctx.images_seen.contains_key(&index) {
        return Ok(doc.reference(NodeType::ImageTexture, image_id));
    }
    ctx.images_seen.insert(index, image_id.clone());

    let imt = doc.create_node(NodeType::ImageTexture);
    doc.declare(imt, image_id)?;
    doc.set_field(imt, "url", FieldValue::StringList(data.url_list()))?;
    Ok(imt)
}

/// TextureTransform node from placement scalars.
pub fn texture_transform(
    doc: &mut Document,
    data: &TextureTransformData,
) -> Result<NodeHandle> {
    let tt = doc.create_node(NodeType::TextureTransform);
    doc.set_field(tt, "translation", data.translation)?;
    doc.set_field(tt, "scale", data.scale)?;
    doc.set_field(tt, "rotation", data.rotation)?;
    Ok(tt)
}

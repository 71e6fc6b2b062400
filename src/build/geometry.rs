//! Shape assembly over the vertex indexer's output.
//!
//! A mesh datablock is exported once: the first object using it gets a
//! declared group, later objects reference the group by name. Within a
//! polygon-mode mesh the coordinate and normal nodes are likewise
//! declared once and referenced by sibling primitive sets.

use glam::Mat4;
use tracing::debug;

use crate::mesh::{index_mesh, ColorLayer, IndexOptions, PrimitiveGeometry, PrimitiveSet, RawMesh};
use crate::scene::{Document, FieldValue, NodeHandle, NodeType};
use crate::util::{Error, Result};

use super::context::{ExportContext, Namespace};
use super::material::{image_texture, material, texture_transform};
use super::objects::transform;
use super::scene_data::{MaterialSlot, MeshObject, SceneData};

/// Build the node tree for one mesh-bearing object.
///
/// Returns None when the mesh has no faces (the node is omitted, the
/// export continues).
pub fn mesh_shapes(
    doc: &mut Document,
    ctx: &mut ExportContext,
    scene: &SceneData,
    obj_name: &str,
    mesh_obj: &MeshObject,
    matrix: &Mat4,
    collision: bool,
) -> Result<Option<NodeHandle>> {
    let mesh = &scene.meshes[mesh_obj.mesh];

    // Index before any node is created, so an empty mesh leaves no
    // abandoned declarations behind.
    let sets = if ctx.mesh_groups.contains_key(&mesh_obj.mesh) {
        None
    } else {
        let opts = IndexOptions {
            triangulate: ctx.settings.triangulate,
            export_normals: ctx.settings.normals,
            export_uv: mesh.corner_uvs.is_some(),
            export_color: mesh.corner_colors.is_some(),
        };
        match index_mesh(mesh, &opts) {
            Ok(sets) => Some(sets),
            Err(Error::EmptyGeometry(name)) => {
                debug!(mesh = %name, "empty mesh omitted");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }
    };

    let obj_id = ctx.unique_name(Namespace::Object, format!("obj:{obj_name}"), obj_name);
    let mesh_id = ctx.unique_name(Namespace::Mesh, format!("mesh:{}", mesh_obj.mesh), &mesh.name);
    let group_id = format!("group_{mesh_id}");

    // The _ifs_TRANSFORM suffix keeps this node clear of the hierarchy
    // transform when both wrap the same object.
    let top = transform(doc, matrix, Some(format!("{obj_id}_ifs_TRANSFORM")))?;
    let mut bottom = top;

    if collision {
        let coll = doc.create_node(NodeType::Collision);
        doc.set_field(coll, "enabled", true)?;
        doc.append_child(bottom, coll)?;
        bottom = coll;
    }

    let Some(sets) = sets else {
        let grp = doc.reference(NodeType::Group, group_id);
        doc.append_child(bottom, grp)?;
        return Ok(Some(top));
    };

    ctx.mesh_groups.insert(mesh_obj.mesh, group_id.clone());
    let grp = doc.create_node(NodeType::Group);
    doc.declare(grp, group_id)?;
    doc.append_child(bottom, grp)?;

    let mut coords_written = false;
    for set in &sets {
        let shape = build_shape(doc, ctx, scene, mesh_obj, &mesh_id, mesh, set, &mut coords_written)?;
        doc.append_child(grp, shape)?;
    }

    Ok(Some(top))
}

fn slot_for(mesh_obj: &MeshObject, material_index: u16) -> Option<&MaterialSlot> {
    mesh_obj.slots.get(material_index as usize)
}

fn build_shape(
    doc: &mut Document,
    ctx: &mut ExportContext,
    scene: &SceneData,
    mesh_obj: &MeshObject,
    mesh_id: &str,
    mesh: &RawMesh,
    set: &PrimitiveSet,
    coords_written: &mut bool,
) -> Result<NodeHandle> {
    let shape = doc.create_node(NodeType::Shape);
    let slot = slot_for(mesh_obj, set.material);

    // Appearance chain: texture (with optional placement) and material.
    let appearance = doc.create_node(NodeType::Appearance);
    if let Some(slot) = slot {
        if let Some(image_index) = slot.image {
            let imt = image_texture(doc, ctx, image_index, &scene.images[image_index])?;
            doc.set_field(appearance, "texture", imt)?;
            if let Some(tt) = &slot.texture_transform {
                let tt = texture_transform(doc, tt)?;
                doc.set_field(appearance, "textureTransform", tt)?;
            }
        }
        if let Some(material_index) = slot.material {
            let mat = material(doc, ctx, material_index, &scene.materials[material_index])?;
            doc.set_field(appearance, "material", mat)?;
        }
    }
    doc.set_field(shape, "appearance", appearance)?;

    let solid = slot
        .and_then(|s| s.material)
        .map(|m| scene.materials[m].backface_culling)
        .unwrap_or(false);

    let geometry = match &set.geometry {
        PrimitiveGeometry::Triangles(tris) => {
            let its = doc.create_node(NodeType::IndexedTriangleSet);
            doc.set_field(its, "solid", solid)?;
            doc.set_field(its, "normalPerVertex", tris.normal_per_vertex)?;
            let flat: Vec<i32> = tris.index.iter().flat_map(|t| t.map(|i| i as i32)).collect();
            doc.set_field(its, "index", FieldValue::IntList(flat))?;

            let coord = doc.create_node(NodeType::Coordinate);
            doc.set_field(coord, "point", FieldValue::Vec3List(tris.points.clone()))?;
            doc.set_field(its, "coord", coord)?;

            if let Some(normals) = &tris.normals {
                let normal = doc.create_node(NodeType::Normal);
                doc.set_field(normal, "vector", FieldValue::Vec3List(normals.clone()))?;
                doc.set_field(its, "normal", normal)?;
            }
            if let Some(uvs) = &tris.uvs {
                let tc = doc.create_node(NodeType::TextureCoordinate);
                doc.set_field(tc, "point", FieldValue::Vec2List(uvs.clone()))?;
                doc.set_field(its, "texCoord", tc)?;
            }
            if let Some(colors) = &tris.colors {
                let col = doc.create_node(NodeType::ColorRgba);
                doc.set_field(col, "color", FieldValue::Vec4List(colors.clone()))?;
                doc.set_field(its, "color", col)?;
            }
            its
        }
        PrimitiveGeometry::Polygons(polys) => {
            let ifs = doc.create_node(NodeType::IndexedFaceSet);
            doc.set_field(ifs, "solid", solid)?;
            if let Some(angle) = polys.crease_angle {
                doc.set_field(ifs, "creaseAngle", angle)?;
            }
            if ctx.settings.normals {
                doc.set_field(ifs, "normalPerVertex", true)?;
            }
            if let Some(tci) = &polys.tex_coord_index {
                doc.set_field(ifs, "texCoordIndex", FieldValue::IntList(tci.clone()))?;
            }
            doc.set_field(ifs, "coordIndex", FieldValue::IntList(polys.coord_index.clone()))?;

            // Mesh-wide coordinate (and normal) nodes, declared by the
            // first primitive set and referenced by the rest.
            let coords_id = format!("coords_{mesh_id}");
            let normals_id = format!("normals_{mesh_id}");
            if *coords_written {
                let coord = doc.reference(NodeType::Coordinate, coords_id);
                doc.set_field(ifs, "coord", coord)?;
                if ctx.settings.normals {
                    let normal = doc.reference(NodeType::Normal, normals_id);
                    doc.set_field(ifs, "normal", normal)?;
                }
            } else {
                let coord = doc.create_node(NodeType::Coordinate);
                doc.declare(coord, coords_id)?;
                doc.set_field(coord, "point", FieldValue::Vec3List(mesh.positions.clone()))?;
                doc.set_field(ifs, "coord", coord)?;
                if ctx.settings.normals {
                    let normal = doc.create_node(NodeType::Normal);
                    doc.declare(normal, normals_id)?;
                    doc.set_field(normal, "vector", FieldValue::Vec3List(mesh.normals.clone()))?;
                    doc.set_field(ifs, "normal", normal)?;
                }
                *coords_written = true;
            }

            if let Some(uvs) = &polys.uvs {
                let tc = doc.create_node(NodeType::TextureCoordinate);
                doc.set_field(tc, "point", FieldValue::Vec2List(uvs.clone()))?;
                doc.set_field(ifs, "texCoord", tc)?;
            }
            if let Some(colors) = &polys.colors {
                let (values, per_vertex) = match colors {
                    ColorLayer::PerVertex(v) => (v.clone(), true),
                    ColorLayer::PerFace(v) => (v.clone(), false),
                };
                if !per_vertex {
                    doc.set_field(ifs, "colorPerVertex", false)?;
                }
                let col = doc.create_node(NodeType::ColorRgba);
                doc.set_field(col, "color", FieldValue::Vec4List(values))?;
                doc.set_field(ifs, "color", col)?;
            }
            ifs
        }
    };
    doc.set_field(shape, "geometry", geometry)?;
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{ExportSettings, SceneData};
    use glam::{Vec2, Vec3};

    fn quad_mesh() -> RawMesh {
        RawMesh {
            name: "Plane".to_string(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            face_counts: vec![4],
            face_indices: vec![0, 1, 2, 3],
            face_materials: vec![0],
            face_smooth: vec![false],
            corner_uvs: Some(vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y]),
            ..Default::default()
        }
    }

    fn scene_with(mesh: RawMesh) -> SceneData {
        SceneData { meshes: vec![mesh], ..Default::default() }
    }

    fn mesh_object() -> MeshObject {
        MeshObject { mesh: 0, slots: vec![MaterialSlot::default()] }
    }

    #[test]
    fn test_mesh_group_def_then_use() {
        let mut doc = Document::with_root(NodeType::Scene);
        let mut ctx = ExportContext::new(ExportSettings::default());
        let scene = scene_with(quad_mesh());

        let first = mesh_shapes(
            &mut doc, &mut ctx, &scene, "Plane", &mesh_object(), &Mat4::IDENTITY, false,
        )
        .unwrap()
        .unwrap();
        let second = mesh_shapes(
            &mut doc, &mut ctx, &scene, "Plane.001", &mesh_object(), &Mat4::IDENTITY, false,
        )
        .unwrap()
        .unwrap();

        // First use declares the group, second references it.
        let first_grp = doc.node(doc.node(first).children()[0]);
        assert_eq!(first_grp.declared_name.as_deref(), Some("group_ME_Plane"));
        let second_grp = doc.node(doc.node(second).children()[0]);
        assert!(second_grp.is_reference());
        assert_eq!(second_grp.reference_name.as_deref(), Some("group_ME_Plane"));
    }

    #[test]
    fn test_empty_mesh_omitted() {
        let mut doc = Document::with_root(NodeType::Scene);
        let mut ctx = ExportContext::new(ExportSettings::default());
        let scene = scene_with(RawMesh { name: "Empty".to_string(), ..Default::default() });

        let built = mesh_shapes(
            &mut doc, &mut ctx, &scene, "Empty", &mesh_object(), &Mat4::IDENTITY, false,
        )
        .unwrap();
        assert!(built.is_none());
        assert!(ctx.mesh_groups.is_empty());
    }

    #[test]
    fn test_polygon_mode_shares_coordinates() {
        let mut mesh = quad_mesh();
        // Two faces in different material slots become two primitive sets.
        mesh.face_counts = vec![3, 3];
        mesh.face_indices = vec![0, 1, 2, 0, 2, 3];
        mesh.face_materials = vec![0, 1];
        mesh.face_smooth = vec![false, false];
        mesh.corner_uvs = None;

        let mut doc = Document::with_root(NodeType::Scene);
        let mut ctx = ExportContext::new(ExportSettings::default());
        let scene = scene_with(mesh);
        let obj = MeshObject { mesh: 0, slots: vec![MaterialSlot::default(); 2] };

        let top = mesh_shapes(&mut doc, &mut ctx, &scene, "Plane", &obj, &Mat4::IDENTITY, false)
            .unwrap()
            .unwrap();

        let grp = doc.node(top).children()[0];
        let shapes: Vec<_> = doc.node(grp).children().to_vec();
        assert_eq!(shapes.len(), 2);

        let coord_of = |shape: NodeHandle| {
            let FieldValue::Node(geom) = doc.node(shape).field("geometry").unwrap() else {
                panic!()
            };
            let FieldValue::Node(coord) = doc.node(*geom).field("coord").unwrap() else { panic!() };
            *coord
        };
        let first = doc.node(coord_of(shapes[0]));
        let second = doc.node(coord_of(shapes[1]));
        assert_eq!(first.declared_name.as_deref(), Some("coords_ME_Plane"));
        assert!(second.is_reference());
        assert_eq!(second.reference_name.as_deref(), Some("coords_ME_Plane"));
    }

    #[test]
    fn test_collision_wrapper() {
        let mut doc = Document::with_root(NodeType::Scene);
        let mut ctx = ExportContext::new(ExportSettings::default());
        let scene = scene_with(quad_mesh());

        let top = mesh_shapes(
            &mut doc, &mut ctx, &scene, "Plane", &mesh_object(), &Mat4::IDENTITY, true,
        )
        .unwrap()
        .unwrap();
        let coll = doc.node(doc.node(top).children()[0]);
        assert_eq!(coll.node_type, NodeType::Collision);
        assert_eq!(coll.field("enabled"), Some(&FieldValue::Bool(true)));
    }
}

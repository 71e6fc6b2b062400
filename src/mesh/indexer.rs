//! Attribute-keyed vertex indexing.
//!
//! Converts a mesh whose per-corner attributes are discontinuous across
//! faces into compact indexed buffers. Faces are grouped by
//! (material, image) into primitive sets; within a group, two corners of
//! the same original vertex share a new index iff their rounded UV/color
//! attribute keys are equal. Positions and normals never force a split.

use std::collections::HashMap;

use glam::{Vec2, Vec3, Vec4};
use smallvec::SmallVec;
use tracing::debug;

use super::raw::{IndexOptions, RawMesh};
use crate::util::{quantize, Error, Result};

/// Index run terminator in polygon-mode index lists.
pub const FACE_END: i32 = -1;

/// Crease angle signaling fully smooth shading when no auto-smooth limit
/// is set (greater than pi, per the classic exporter behavior).
pub const SMOOTH_CREASE_ANGLE: f32 = 4.0;

/// Rounded per-corner attribute tuple; the sole vertex-splitting criterion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
struct AttrKey(SmallVec<[i64; 6]>);

impl AttrKey {
    fn for_corner(
        corner: usize,
        uvs: Option<&[Vec2]>,
        colors: Option<&[Vec4]>,
    ) -> Self {
        let mut key = SmallVec::new();
        if let Some(uvs) = uvs {
            let uv = uvs[corner];
            key.push(quantize(uv.x));
            key.push(quantize(uv.y));
        }
        if let Some(colors) = colors {
            let c = colors[corner];
            key.push(quantize(c.x));
            key.push(quantize(c.y));
            key.push(quantize(c.z));
            key.push(quantize(c.w));
        }
        AttrKey(key)
    }
}

/// Triangulated buffers for one (material, image) group.
#[derive(Clone, Debug, Default)]
pub struct TriangleSet {
    /// Triangle corner indices into the new-vertex buffers.
    pub index: Vec<[u32; 3]>,
    /// Positions in new-vertex order.
    pub points: Vec<Vec3>,
    /// Normals in new-vertex order (present iff `normal_per_vertex`).
    pub normals: Option<Vec<Vec3>>,
    /// UVs in new-vertex order.
    pub uvs: Option<Vec<Vec2>>,
    /// Colors in new-vertex order.
    pub colors: Option<Vec<Vec4>>,
    /// Explicit per-vertex normals vs. renderer-computed flat shading.
    pub normal_per_vertex: bool,
}

/// Color layout for polygon-mode groups.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorLayer {
    /// One color per original vertex (every face agrees on it).
    PerVertex(Vec<Vec4>),
    /// One color per face in group order.
    PerFace(Vec<Vec4>),
}

/// Polygon-mode buffers for one (material, image) group.
///
/// Coordinates stay in original vertex order and are shared mesh-wide
/// (declared once, referenced by sibling groups); only the index lists
/// and attribute runs are group-local.
#[derive(Clone, Debug, Default)]
pub struct PolygonSet {
    /// Original vertex index runs, one per face, each ended by [`FACE_END`].
    pub coord_index: Vec<i32>,
    /// Parallel texture-coordinate index runs with their own terminators.
    pub tex_coord_index: Option<Vec<i32>>,
    /// Per-corner UVs in group order, addressed by `tex_coord_index`.
    pub uvs: Option<Vec<Vec2>>,
    /// Colors, per-vertex when possible, per-face otherwise.
    pub colors: Option<ColorLayer>,
    /// Crease angle for smooth groups (absent for flat groups).
    pub crease_angle: Option<f32>,
}

/// Geometry payload of a primitive set.
#[derive(Clone, Debug)]
pub enum PrimitiveGeometry {
    Triangles(TriangleSet),
    Polygons(PolygonSet),
}

/// One renderable primitive set: the faces of one (material, image) group
/// in indexed form.
#[derive(Clone, Debug)]
pub struct PrimitiveSet {
    /// Material slot this group renders with.
    pub material: u16,
    /// Image identity this group renders with.
    pub image: Option<u32>,
    /// Indexed geometry buffers.
    pub geometry: PrimitiveGeometry,
}

/// Index a mesh into primitive sets.
///
/// A mesh with zero faces yields [`Error::EmptyGeometry`]; the caller
/// omits the node rather than failing the export.
pub fn index_mesh(mesh: &RawMesh, opts: &IndexOptions) -> Result<Vec<PrimitiveSet>> {
    if !mesh.is_valid() {
        return Err(Error::EmptyGeometry(mesh.name.clone()));
    }

    let uvs = if opts.export_uv { mesh.corner_uvs.as_deref() } else { None };
    let colors = if opts.export_color { mesh.corner_colors.as_deref() } else { None };

    // Group faces by (material, image) in first-seen face order so output
    // never depends on map iteration order.
    let mut group_keys: Vec<(u16, Option<u32>)> = Vec::new();
    let mut group_faces: Vec<Vec<usize>> = Vec::new();
    for face in 0..mesh.num_faces() {
        let key = (mesh.face_materials[face], mesh.face_image(face));
        match group_keys.iter().position(|&k| k == key) {
            Some(i) => group_faces[i].push(face),
            None => {
                group_keys.push(key);
                group_faces.push(vec![face]);
            }
        }
    }

    let vertex_colors = if opts.triangulate {
        None
    } else {
        colors.map(|layer| per_vertex_colors(mesh, layer))
    };

    let mut sets = Vec::with_capacity(group_keys.len());
    for ((material, image), faces) in group_keys.into_iter().zip(group_faces) {
        let geometry = if opts.triangulate {
            PrimitiveGeometry::Triangles(index_triangles(mesh, &faces, uvs, colors, opts))
        } else {
            PrimitiveGeometry::Polygons(index_polygons(
                mesh,
                &faces,
                uvs,
                vertex_colors.as_ref().map(|v| (colors.unwrap(), v)),
            ))
        };
        sets.push(PrimitiveSet { material, image, geometry });
    }

    debug!(
        mesh = %mesh.name,
        groups = sets.len(),
        faces = mesh.num_faces(),
        "mesh indexed"
    );
    Ok(sets)
}

/// Triangulated mode: fan-triangulate each face and dedup corners through
/// the (original_vertex, attribute_key) map in first-seen order.
fn index_triangles(
    mesh: &RawMesh,
    faces: &[usize],
    uvs: Option<&[Vec2]>,
    colors: Option<&[Vec4]>,
    opts: &IndexOptions,
) -> TriangleSet {
    let is_smooth = faces.iter().any(|&f| mesh.face_smooth[f]);

    // UVs and vertex colors split vertices, which breaks implicit flat
    // shading; a triangle set also cannot carry a crease angle, so smooth
    // groups always get explicit normals.
    let force_normals = is_smooth || uvs.is_some() || colors.is_some();
    let normal_per_vertex = opts.export_normals || force_normals;

    // One dedup bucket per original vertex; bucket lookups are keyed by
    // the rounded attribute tuple only.
    let mut vertex_maps: Vec<HashMap<AttrKey, u32>> = vec![HashMap::new(); mesh.num_vertices()];
    // (original vertex, representative corner) in new-vertex order.
    let mut new_vertices: Vec<(u32, usize)> = Vec::new();
    let mut index = Vec::new();

    let mut triangle = [0u32; 3];
    for &face in faces {
        let corners = mesh.face_corners(face);
        let base = corners.start;
        let count = corners.len();
        for i in 1..count.saturating_sub(1) {
            for (slot, corner) in [base, base + i, base + i + 1].into_iter().enumerate() {
                let vid = mesh.face_indices[corner];
                let key = AttrKey::for_corner(corner, uvs, colors);
                let next = new_vertices.len() as u32;
                let new_index = *vertex_maps[vid as usize].entry(key).or_insert_with(|| {
                    new_vertices.push((vid, corner));
                    next
                });
                triangle[slot] = new_index;
            }
            index.push(triangle);
        }
    }

    TriangleSet {
        index,
        points: new_vertices.iter().map(|&(vid, _)| mesh.positions[vid as usize]).collect(),
        normals: normal_per_vertex.then(|| {
            new_vertices.iter().map(|&(vid, _)| mesh.normals[vid as usize]).collect()
        }),
        uvs: uvs.map(|layer| new_vertices.iter().map(|&(_, c)| layer[c]).collect()),
        colors: colors.map(|layer| new_vertices.iter().map(|&(_, c)| layer[c]).collect()),
        normal_per_vertex,
    }
}

/// Polygon mode: keep original vertex runs per face, with a parallel
/// texture-coordinate index list instead of merged attribute keys.
fn index_polygons(
    mesh: &RawMesh,
    faces: &[usize],
    uvs: Option<&[Vec2]>,
    colors: Option<(&[Vec4], &Option<Vec<Vec4>>)>,
) -> PolygonSet {
    let is_smooth = faces.iter().any(|&f| mesh.face_smooth[f]);

    let mut coord_index = Vec::new();
    let mut tex_coord_index = uvs.map(|_| Vec::new());
    let mut group_uvs = uvs.map(|_| Vec::new());

    let mut next_uv = 0i32;
    for &face in faces {
        let corners = mesh.face_corners(face);
        for corner in corners.clone() {
            coord_index.push(mesh.face_indices[corner] as i32);
        }
        coord_index.push(FACE_END);

        if let (Some(tci), Some(guvs), Some(layer)) =
            (tex_coord_index.as_mut(), group_uvs.as_mut(), uvs)
        {
            for corner in corners {
                tci.push(next_uv);
                next_uv += 1;
                guvs.push(layer[corner]);
            }
            tci.push(FACE_END);
        }
    }

    let colors = colors.map(|(layer, per_vertex)| match per_vertex {
        Some(vert_colors) => ColorLayer::PerVertex(vert_colors.clone()),
        None => ColorLayer::PerFace(
            faces
                .iter()
                .map(|&f| layer[mesh.face_corners(f).start])
                .collect(),
        ),
    });

    PolygonSet {
        coord_index,
        tex_coord_index,
        uvs: group_uvs,
        colors,
        crease_angle: is_smooth
            .then(|| mesh.auto_smooth_angle.unwrap_or(SMOOTH_CREASE_ANGLE)),
    }
}

/// Check whether every face that uses a vertex agrees on its color; if
/// so, colors can be written per-vertex instead of per-face.
fn per_vertex_colors(mesh: &RawMesh, layer: &[Vec4]) -> Option<Vec<Vec4>> {
    let mut vert_color: Vec<Option<Vec4>> = vec![None; mesh.num_vertices()];
    for (_, corners) in mesh.faces() {
        for corner in corners {
            let vid = mesh.face_indices[corner] as usize;
            match vert_color[vid] {
                None => vert_color[vid] = Some(layer[corner]),
                Some(existing) if existing != layer[corner] => return None,
                Some(_) => {}
            }
        }
    }
    Some(vert_color.into_iter().map(|c| c.unwrap_or(Vec4::ZERO)).collect())
}

//! Raw mesh input supplied by the scene-traversal collaborator.
//!
//! Attributes arrive already extracted: positions and normals per
//! original vertex, faces as a count/index pair of flat arrays, and
//! optional UV/color layers per corner (face-vertex).

use glam::{Vec2, Vec3, Vec4};
use std::ops::Range;

/// Polygonal mesh data in collaborator layout.
#[derive(Clone, Debug, Default)]
pub struct RawMesh {
    /// Mesh datablock name (used for declared-name derivation).
    pub name: String,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, parallel to `positions`.
    pub normals: Vec<Vec3>,
    /// Number of vertices per face.
    pub face_counts: Vec<u32>,
    /// Flattened corner list - indices into `positions`.
    pub face_indices: Vec<u32>,
    /// Material slot per face (0 when the mesh has no materials).
    pub face_materials: Vec<u16>,
    /// Smooth-shading flag per face.
    pub face_smooth: Vec<bool>,
    /// UV coordinates per corner, parallel to `face_indices` (optional).
    pub corner_uvs: Option<Vec<Vec2>>,
    /// RGBA colors per corner, parallel to `face_indices` (optional).
    pub corner_colors: Option<Vec<Vec4>>,
    /// Image identity per material slot - faces sharing a slot image are
    /// grouped into one primitive set.
    pub slot_images: Vec<Option<u32>>,
    /// Auto-smooth crease angle in radians, if the mesh limits smoothing.
    pub auto_smooth_angle: Option<f32>,
}

impl RawMesh {
    /// Get number of faces.
    pub fn num_faces(&self) -> usize {
        self.face_counts.len()
    }

    /// Get number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get total number of corners (face-vertex entries).
    pub fn num_corners(&self) -> usize {
        self.face_indices.len()
    }

    /// Check if the mesh has faces and positions.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty()
            && !self.face_counts.is_empty()
            && !self.face_indices.is_empty()
    }

    /// Corner range of a face inside the flat arrays.
    pub fn face_corners(&self, face: usize) -> Range<usize> {
        let start: usize = self.face_counts[..face].iter().map(|&c| c as usize).sum();
        start..start + self.face_counts[face] as usize
    }

    /// Iterate faces as (face_index, corner_range).
    pub fn faces(&self) -> impl Iterator<Item = (usize, Range<usize>)> + '_ {
        let mut offset = 0usize;
        self.face_counts.iter().enumerate().map(move |(i, &count)| {
            let start = offset;
            offset += count as usize;
            (i, start..offset)
        })
    }

    /// Image identity for a face, through its material slot.
    pub fn face_image(&self, face: usize) -> Option<u32> {
        let slot = self.face_materials[face] as usize;
        self.slot_images.get(slot).copied().flatten()
    }
}

/// Indexing flags, fixed per export run.
#[derive(Clone, Copy, Debug, Default)]
pub struct IndexOptions {
    /// Emit triangle sets instead of polygon face sets.
    pub triangulate: bool,
    /// Export explicit normals.
    pub export_normals: bool,
    /// Export the UV layer, if present.
    pub export_uv: bool,
    /// Export the vertex-color layer, if present.
    pub export_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> RawMesh {
        RawMesh {
            name: "quad".to_string(),
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
            ..Default::default()
        }
    }

    #[test]
    fn test_face_iteration() {
        let mut mesh = quad();
        mesh.face_counts = vec![3, 1];
        let ranges: Vec<_> = mesh.faces().map(|(_, r)| r).collect();
        assert_eq!(ranges, vec![0..3, 3..4]);
        assert_eq!(mesh.face_corners(1), 3..4);
    }

    #[test]
    fn test_validity() {
        assert!(quad().is_valid());
        let empty = RawMesh::default();
        assert!(!empty.is_valid());
        assert_eq!(empty.num_faces(), 0);
    }
}

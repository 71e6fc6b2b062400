//! Vertex indexing: raw collaborator mesh data in, deduplicated indexed
//! buffers out.
//!
//! - [`RawMesh`] / [`IndexOptions`] - input model and flags
//! - [`index_mesh`] - grouping + attribute-keyed deduplication
//! - [`PrimitiveSet`] - per-(material, image) indexed buffers

mod indexer;
mod raw;

pub use indexer::{
    index_mesh, ColorLayer, PolygonSet, PrimitiveGeometry, PrimitiveSet, TriangleSet,
    FACE_END, SMOOTH_CREASE_ANGLE,
};
pub use raw::{IndexOptions, RawMesh};

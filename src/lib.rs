//! # x3dv
//!
//! Shared-node scene graph construction and multi-encoding export.
//!
//! Converts an arbitrary polygonal scene - already-extracted positions,
//! normals, UVs, colors, transforms, materials, lights and animation
//! samples - into a scene graph with define-once/reference-many (DEF/USE)
//! node identity, then serializes it into one of four textual encodings:
//! X3D XML, Classic VRML, X3D JSON, or an x3dom HTML page.
//!
//! ## Modules
//!
//! - [`util`] - Errors, math re-exports, rounding, name sanitization
//! - [`scene`] - Typed fields, node arena, document, reference resolver
//! - [`mesh`] - Attribute-keyed vertex indexing
//! - [`encode`] - The four textual encoders
//! - [`build`] - Scene assembly from collaborator data
//! - [`export`] - Entry points (assemble, resolve, encode, write)
//!
//! ## Example
//!
//! ```ignore
//! use x3dv::prelude::*;
//!
//! let settings = ExportSettings { format: Format::Vrml, ..Default::default() };
//! let payload = export_scene(&scene, &settings)?;
//! write_file(&payload, "scene.x3dv", settings.compress)?;
//! ```

pub mod build;
pub mod encode;
pub mod export;
pub mod mesh;
pub mod scene;
pub mod util;

// Re-export commonly used types
pub use encode::Format;
pub use export::{export_scene, save, write_file};
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::build::{
        CameraData, ExportContext, ExportSettings, HumanoidData, ImageData, JointData,
        KeyframeTrack, LightData, LightKind, MaterialData, MaterialSlot, MeshObject, MistData,
        ObjectBody, SceneData, SceneObject, WorldData,
    };
    pub use crate::encode::Format;
    pub use crate::export::{export_scene, save, write_file};
    pub use crate::mesh::{index_mesh, IndexOptions, PrimitiveSet, RawMesh};
    pub use crate::scene::{resolve, Document, FieldValue, Node, NodeHandle, NodeType};
    pub use crate::util::{Error, Result};
}

//! Scene input model.
//!
//! The traversal collaborator hands over already-extracted data: local
//! matrices, light/camera scalars, material scalars, image paths, raw
//! meshes, pre-sampled animation keys. Indices into the scene-level
//! tables express sharing (two objects using one mesh or material).

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::mesh::RawMesh;

/// A whole scene to export.
#[derive(Clone, Debug, Default)]
pub struct SceneData {
    /// World/background settings.
    pub world: Option<WorldData>,
    /// Mesh datablocks, shared by index.
    pub meshes: Vec<RawMesh>,
    /// Material datablocks, shared by index.
    pub materials: Vec<MaterialData>,
    /// Image datablocks, shared by index.
    pub images: Vec<ImageData>,
    /// Object hierarchy roots.
    pub objects: Vec<SceneObject>,
    /// Pre-sampled animation tracks targeting declared transforms.
    pub animations: Vec<KeyframeTrack>,
}

/// One object in the hierarchy.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    /// Local matrix (relative to the parent object).
    pub matrix: Mat4,
    pub body: ObjectBody,
    pub children: Vec<SceneObject>,
    /// Wrap the object's geometry in a collision node.
    pub collision: bool,
}

impl SceneObject {
    /// Plain grouping object with no body.
    pub fn empty(name: impl Into<String>, matrix: Mat4) -> Self {
        Self {
            name: name.into(),
            matrix,
            body: ObjectBody::Empty,
            children: Vec::new(),
            collision: false,
        }
    }
}

/// What an object contributes to the scene.
#[derive(Clone, Debug)]
pub enum ObjectBody {
    Empty,
    Mesh(MeshObject),
    Light(LightData),
    Camera(CameraData),
    Armature(HumanoidData),
}

/// Mesh usage: which datablock, with which material/image slots.
#[derive(Clone, Debug)]
pub struct MeshObject {
    /// Index into [`SceneData::meshes`].
    pub mesh: usize,
    /// Per-slot material/image assignment, parallel to the mesh's
    /// material slots.
    pub slots: Vec<MaterialSlot>,
}

/// One material slot of a mesh object.
#[derive(Clone, Debug, Default)]
pub struct MaterialSlot {
    /// Index into [`SceneData::materials`].
    pub material: Option<usize>,
    /// Index into [`SceneData::images`].
    pub image: Option<usize>,
    /// Texture placement, when the slot maps its image.
    pub texture_transform: Option<TextureTransformData>,
}

/// Texture placement scalars.
#[derive(Clone, Debug)]
pub struct TextureTransformData {
    pub translation: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
}

/// Material scalars in collaborator terms.
#[derive(Clone, Debug)]
pub struct MaterialData {
    pub name: String,
    /// Diffuse RGBA; alpha drives transparency.
    pub diffuse: Vec4,
    pub specular_color: Vec3,
    pub specular_intensity: f32,
    pub backface_culling: bool,
}

/// Image datablock: name plus the path it was loaded from.
#[derive(Clone, Debug)]
pub struct ImageData {
    pub name: String,
    pub filepath: String,
}

impl ImageData {
    /// URL candidates in preference order: the reference path, then the
    /// bare basename. Backslashes normalize to forward slashes and
    /// duplicates collapse.
    pub fn url_list(&self) -> Vec<String> {
        let filepath = self.filepath.replace('\\', "/");
        let basename = filepath.rsplit('/').next().unwrap_or(&filepath).to_string();
        let mut urls = vec![filepath];
        if !urls.contains(&basename) {
            urls.push(basename);
        }
        urls
    }
}

/// Light kinds and their scalars.
#[derive(Clone, Debug)]
pub enum LightKind {
    Point,
    Spot {
        /// Cone aperture in radians.
        spot_size: f32,
    },
    /// Sun and any unhandled kind export as directional.
    Directional,
}

/// Light scalars in collaborator terms.
#[derive(Clone, Debug)]
pub struct LightData {
    pub kind: LightKind,
    pub color: Vec3,
    pub energy: f32,
    /// Influence distance (radius-like falloff).
    pub distance: f32,
}

/// Camera scalars.
#[derive(Clone, Debug)]
pub struct CameraData {
    /// Field of view in radians.
    pub angle: f32,
}

/// World/background scalars.
#[derive(Clone, Debug)]
pub struct WorldData {
    pub name: String,
    pub color: Vec3,
    pub mist: Option<MistData>,
}

/// Mist/fog scalars.
#[derive(Clone, Copy, Debug)]
pub struct MistData {
    /// Linear falloff, otherwise exponential.
    pub linear: bool,
    pub depth: f32,
}

/// Pre-sampled animation keys for one declared transform.
#[derive(Clone, Debug)]
pub struct KeyframeTrack {
    /// Declared name of the target transform node.
    pub target: String,
    /// Animation length in seconds.
    pub cycle_interval: f32,
    /// Normalized key times in [0, 1], ascending.
    pub times: Vec<f32>,
    /// Position per key.
    pub positions: Option<Vec<Vec3>>,
    /// Axis-angle rotation per key.
    pub rotations: Option<Vec<Vec4>>,
}

/// Skeleton input for an armature object.
#[derive(Clone, Debug)]
pub struct HumanoidData {
    pub name: String,
    /// Skeleton root joints.
    pub skeleton: Vec<JointData>,
    /// Skin vertex positions (optional).
    pub skin_coord: Option<Vec<Vec3>>,
    /// Skin vertex normals (optional).
    pub skin_normal: Option<Vec<Vec3>>,
    /// Pre-sampled motion blocks (optional).
    pub motions: Vec<MotionData>,
}

/// One joint in a skeleton tree.
#[derive(Clone, Debug)]
pub struct JointData {
    pub name: String,
    pub center: Vec3,
    pub children: Vec<JointData>,
    /// End-effector site attached to this joint, if any.
    pub site: Option<SiteData>,
}

/// End-effector site scalars.
#[derive(Clone, Debug)]
pub struct SiteData {
    pub name: String,
    pub translation: Vec3,
}

/// Pre-sampled motion block.
#[derive(Clone, Debug)]
pub struct MotionData {
    pub description: String,
    pub frame_count: i32,
    pub frame_duration: f32,
    pub values: Vec<f32>,
}

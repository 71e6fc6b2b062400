//! Node type vocabulary and per-type field schemas.
//!
//! The schema fixes, per node type, which fields exist, what value kind
//! each accepts, and whether the type has a children slot. `set_field`
//! and `append_child` validate against it at build time; the encoders
//! rely on it never being violated.

use super::field::FieldKind;

/// Closed set of node types the builders emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    X3D,
    Head,
    Meta,
    Scene,
    WorldInfo,
    Group,
    Transform,
    Collision,
    Shape,
    Appearance,
    Material,
    ImageTexture,
    TextureTransform,
    IndexedFaceSet,
    IndexedTriangleSet,
    Coordinate,
    Normal,
    TextureCoordinate,
    ColorRgba,
    PointLight,
    SpotLight,
    DirectionalLight,
    Viewpoint,
    NavigationInfo,
    Background,
    Fog,
    TimeSensor,
    PositionInterpolator,
    OrientationInterpolator,
    Route,
    HAnimHumanoid,
    HAnimJoint,
    HAnimSegment,
    HAnimSite,
    HAnimMotion,
}

/// One field's contract: name and accepted value kind.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// A node type's contract: element name, field table, children slot.
#[derive(Debug)]
pub struct NodeSpec {
    pub element: &'static str,
    pub fields: &'static [FieldSpec],
    pub has_children: bool,
}

use FieldKind::*;

static X3D_SPEC: NodeSpec = NodeSpec {
    element: "X3D",
    fields: &[
        field("profile", String),
        field("version", String),
        field("head", Node),
        field("Scene", Node),
    ],
    has_children: false,
};

static HEAD_SPEC: NodeSpec = NodeSpec { element: "head", fields: &[], has_children: true };

static META_SPEC: NodeSpec = NodeSpec {
    element: "meta",
    fields: &[field("name", String), field("content", String)],
    has_children: false,
};

static SCENE_SPEC: NodeSpec = NodeSpec { element: "Scene", fields: &[], has_children: true };

static WORLD_INFO_SPEC: NodeSpec = NodeSpec {
    element: "WorldInfo",
    fields: &[field("title", String)],
    has_children: false,
};

static GROUP_SPEC: NodeSpec = NodeSpec { element: "Group", fields: &[], has_children: true };

static TRANSFORM_SPEC: NodeSpec = NodeSpec {
    element: "Transform",
    fields: &[
        field("translation", Vec3),
        field("rotation", Vec4),
        field("scale", Vec3),
        field("center", Vec3),
    ],
    has_children: true,
};

static COLLISION_SPEC: NodeSpec = NodeSpec {
    element: "Collision",
    fields: &[field("enabled", Bool)],
    has_children: true,
};

static SHAPE_SPEC: NodeSpec = NodeSpec {
    element: "Shape",
    fields: &[field("appearance", Node), field("geometry", Node)],
    has_children: false,
};

static APPEARANCE_SPEC: NodeSpec = NodeSpec {
    element: "Appearance",
    fields: &[
        field("material", Node),
        field("texture", Node),
        field("textureTransform", Node),
    ],
    has_children: false,
};

static MATERIAL_SPEC: NodeSpec = NodeSpec {
    element: "Material",
    fields: &[
        field("diffuseColor", Vec3),
        field("specularColor", Vec3),
        field("emissiveColor", Vec3),
        field("ambientIntensity", Float),
        field("shininess", Float),
        field("transparency", Float),
    ],
    has_children: false,
};

static IMAGE_TEXTURE_SPEC: NodeSpec = NodeSpec {
    element: "ImageTexture",
    fields: &[
        field("url", StringList),
        field("repeatS", Bool),
        field("repeatT", Bool),
    ],
    has_children: false,
};

static TEXTURE_TRANSFORM_SPEC: NodeSpec = NodeSpec {
    element: "TextureTransform",
    fields: &[
        field("translation", Vec2),
        field("scale", Vec2),
        field("rotation", Float),
        field("center", Vec2),
    ],
    has_children: false,
};

static INDEXED_FACE_SET_SPEC: NodeSpec = NodeSpec {
    element: "IndexedFaceSet",
    fields: &[
        field("coord", Node),
        field("normal", Node),
        field("texCoord", Node),
        field("color", Node),
        field("coordIndex", IntList),
        field("texCoordIndex", IntList),
        field("normalPerVertex", Bool),
        field("colorPerVertex", Bool),
        field("creaseAngle", Float),
        field("solid", Bool),
    ],
    has_children: false,
};

static INDEXED_TRIANGLE_SET_SPEC: NodeSpec = NodeSpec {
    element: "IndexedTriangleSet",
    fields: &[
        field("coord", Node),
        field("normal", Node),
        field("texCoord", Node),
        field("color", Node),
        field("index", IntList),
        field("normalPerVertex", Bool),
        field("colorPerVertex", Bool),
        field("solid", Bool),
    ],
    has_children: false,
};

static COORDINATE_SPEC: NodeSpec = NodeSpec {
    element: "Coordinate",
    fields: &[field("point", Vec3List)],
    has_children: false,
};

static NORMAL_SPEC: NodeSpec = NodeSpec {
    element: "Normal",
    fields: &[field("vector", Vec3List)],
    has_children: false,
};

static TEXTURE_COORDINATE_SPEC: NodeSpec = NodeSpec {
    element: "TextureCoordinate",
    fields: &[field("point", Vec2List)],
    has_children: false,
};

static COLOR_RGBA_SPEC: NodeSpec = NodeSpec {
    element: "ColorRGBA",
    fields: &[field("color", Vec4List)],
    has_children: false,
};

static POINT_LIGHT_SPEC: NodeSpec = NodeSpec {
    element: "PointLight",
    fields: &[
        field("location", Vec3),
        field("radius", Float),
        field("intensity", Float),
        field("ambientIntensity", Float),
        field("color", Vec3),
    ],
    has_children: false,
};

static SPOT_LIGHT_SPEC: NodeSpec = NodeSpec {
    element: "SpotLight",
    fields: &[
        field("location", Vec3),
        field("direction", Vec3),
        field("radius", Float),
        field("intensity", Float),
        field("ambientIntensity", Float),
        field("color", Vec3),
        field("beamWidth", Float),
        field("cutOffAngle", Float),
    ],
    has_children: false,
};

static DIRECTIONAL_LIGHT_SPEC: NodeSpec = NodeSpec {
    element: "DirectionalLight",
    fields: &[
        field("direction", Vec3),
        field("intensity", Float),
        field("ambientIntensity", Float),
        field("color", Vec3),
    ],
    has_children: false,
};

static VIEWPOINT_SPEC: NodeSpec = NodeSpec {
    element: "Viewpoint",
    fields: &[
        field("position", Vec3),
        field("orientation", Vec4),
        field("fieldOfView", Float),
        field("centerOfRotation", Vec3),
        field("description", String),
    ],
    has_children: false,
};

static NAVIGATION_INFO_SPEC: NodeSpec = NodeSpec {
    element: "NavigationInfo",
    fields: &[
        field("headlight", Bool),
        field("visibilityLimit", Float),
        field("type", StringList),
        field("avatarSize", FloatList),
    ],
    has_children: false,
};

static BACKGROUND_SPEC: NodeSpec = NodeSpec {
    element: "Background",
    fields: &[
        field("skyColor", Vec3List),
        field("groundColor", Vec3List),
        field("skyAngle", FloatList),
        field("groundAngle", FloatList),
        field("frontUrl", StringList),
        field("backUrl", StringList),
        field("leftUrl", StringList),
        field("rightUrl", StringList),
        field("topUrl", StringList),
        field("bottomUrl", StringList),
    ],
    has_children: false,
};

static FOG_SPEC: NodeSpec = NodeSpec {
    element: "Fog",
    fields: &[
        field("fogType", String),
        field("color", Vec3),
        field("visibilityRange", Float),
    ],
    has_children: false,
};

static TIME_SENSOR_SPEC: NodeSpec = NodeSpec {
    element: "TimeSensor",
    fields: &[
        field("cycleInterval", Float),
        field("loop", Bool),
        field("enabled", Bool),
    ],
    has_children: false,
};

static POSITION_INTERPOLATOR_SPEC: NodeSpec = NodeSpec {
    element: "PositionInterpolator",
    fields: &[field("key", FloatList), field("keyValue", Vec3List)],
    has_children: false,
};

static ORIENTATION_INTERPOLATOR_SPEC: NodeSpec = NodeSpec {
    element: "OrientationInterpolator",
    fields: &[field("key", FloatList), field("keyValue", Vec4List)],
    has_children: false,
};

static ROUTE_SPEC: NodeSpec = NodeSpec {
    element: "ROUTE",
    fields: &[
        field("fromNode", String),
        field("fromField", String),
        field("toNode", String),
        field("toField", String),
    ],
    has_children: false,
};

static HANIM_HUMANOID_SPEC: NodeSpec = NodeSpec {
    element: "HAnimHumanoid",
    fields: &[
        field("name", String),
        field("version", String),
        field("center", Vec3),
        field("skeleton", NodeList),
        field("joints", NodeList),
        field("segments", NodeList),
        field("sites", NodeList),
        field("skin", NodeList),
        field("skinCoord", Node),
        field("skinNormal", Node),
        field("motions", NodeList),
    ],
    has_children: false,
};

static HANIM_JOINT_SPEC: NodeSpec = NodeSpec {
    element: "HAnimJoint",
    fields: &[
        field("name", String),
        field("center", Vec3),
        field("rotation", Vec4),
        field("translation", Vec3),
    ],
    has_children: true,
};

static HANIM_SEGMENT_SPEC: NodeSpec = NodeSpec {
    element: "HAnimSegment",
    fields: &[field("name", String)],
    has_children: true,
};

static HANIM_SITE_SPEC: NodeSpec = NodeSpec {
    element: "HAnimSite",
    fields: &[
        field("name", String),
        field("translation", Vec3),
        field("rotation", Vec4),
    ],
    has_children: true,
};

static HANIM_MOTION_SPEC: NodeSpec = NodeSpec {
    element: "HAnimMotion",
    fields: &[
        field("description", String),
        field("frameCount", Int),
        field("frameDuration", Float),
        field("values", FloatList),
    ],
    has_children: false,
};

impl NodeType {
    /// Schema for this node type.
    pub fn spec(&self) -> &'static NodeSpec {
        match self {
            NodeType::X3D => &X3D_SPEC,
            NodeType::Head => &HEAD_SPEC,
            NodeType::Meta => &META_SPEC,
            NodeType::Scene => &SCENE_SPEC,
            NodeType::WorldInfo => &WORLD_INFO_SPEC,
            NodeType::Group => &GROUP_SPEC,
            NodeType::Transform => &TRANSFORM_SPEC,
            NodeType::Collision => &COLLISION_SPEC,
            NodeType::Shape => &SHAPE_SPEC,
            NodeType::Appearance => &APPEARANCE_SPEC,
            NodeType::Material => &MATERIAL_SPEC,
            NodeType::ImageTexture => &IMAGE_TEXTURE_SPEC,
            NodeType::TextureTransform => &TEXTURE_TRANSFORM_SPEC,
            NodeType::IndexedFaceSet => &INDEXED_FACE_SET_SPEC,
            NodeType::IndexedTriangleSet => &INDEXED_TRIANGLE_SET_SPEC,
            NodeType::Coordinate => &COORDINATE_SPEC,
            NodeType::Normal => &NORMAL_SPEC,
            NodeType::TextureCoordinate => &TEXTURE_COORDINATE_SPEC,
            NodeType::ColorRgba => &COLOR_RGBA_SPEC,
            NodeType::PointLight => &POINT_LIGHT_SPEC,
            NodeType::SpotLight => &SPOT_LIGHT_SPEC,
            NodeType::DirectionalLight => &DIRECTIONAL_LIGHT_SPEC,
            NodeType::Viewpoint => &VIEWPOINT_SPEC,
            NodeType::NavigationInfo => &NAVIGATION_INFO_SPEC,
            NodeType::Background => &BACKGROUND_SPEC,
            NodeType::Fog => &FOG_SPEC,
            NodeType::TimeSensor => &TIME_SENSOR_SPEC,
            NodeType::PositionInterpolator => &POSITION_INTERPOLATOR_SPEC,
            NodeType::OrientationInterpolator => &ORIENTATION_INTERPOLATOR_SPEC,
            NodeType::Route => &ROUTE_SPEC,
            NodeType::HAnimHumanoid => &HANIM_HUMANOID_SPEC,
            NodeType::HAnimJoint => &HANIM_JOINT_SPEC,
            NodeType::HAnimSegment => &HANIM_SEGMENT_SPEC,
            NodeType::HAnimSite => &HANIM_SITE_SPEC,
            NodeType::HAnimMotion => &HANIM_MOTION_SPEC,
        }
    }

    /// Element/tag name used by the encoders.
    pub fn element_name(&self) -> &'static str {
        self.spec().element
    }

    /// Accepted kind for a field name, or None if the field is unknown.
    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.spec().fields.iter().find(|f| f.name == name).map(|f| f.kind)
    }

    /// Whether this type can hold child nodes.
    pub fn has_children_slot(&self) -> bool {
        self.spec().has_children
    }

    /// Default container field a node of this type lands in when nested.
    ///
    /// The tag/attribute grammar only spells out `containerField` when a
    /// node sits in a non-default slot (a Coordinate under `skinCoord`, a
    /// joint under `joints`).
    pub fn default_container(&self) -> &'static str {
        match self {
            NodeType::Head => "head",
            NodeType::Scene => "Scene",
            NodeType::Appearance => "appearance",
            NodeType::Material => "material",
            NodeType::ImageTexture => "texture",
            NodeType::TextureTransform => "textureTransform",
            NodeType::IndexedFaceSet | NodeType::IndexedTriangleSet => "geometry",
            NodeType::Coordinate => "coord",
            NodeType::Normal => "normal",
            NodeType::TextureCoordinate => "texCoord",
            NodeType::ColorRgba => "color",
            _ => "children",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        assert_eq!(NodeType::Transform.field_kind("translation"), Some(FieldKind::Vec3));
        assert_eq!(NodeType::Transform.field_kind("rotation"), Some(FieldKind::Vec4));
        assert_eq!(NodeType::Transform.field_kind("bogus"), None);
    }

    #[test]
    fn test_children_slots() {
        assert!(NodeType::Group.has_children_slot());
        assert!(NodeType::Transform.has_children_slot());
        assert!(NodeType::HAnimJoint.has_children_slot());
        assert!(!NodeType::Shape.has_children_slot());
        assert!(!NodeType::Coordinate.has_children_slot());
    }

    #[test]
    fn test_element_names() {
        assert_eq!(NodeType::ColorRgba.element_name(), "ColorRGBA");
        assert_eq!(NodeType::Route.element_name(), "ROUTE");
        assert_eq!(NodeType::Head.element_name(), "head");
    }

    #[test]
    fn test_structural_fields_in_schema() {
        // The resolver walks every Node/NodeList field; the humanoid type
        // must expose all of its container slots through the schema.
        let spec = NodeType::HAnimHumanoid.spec();
        for name in ["skeleton", "joints", "segments", "sites", "skin", "motions"] {
            let kind = spec.fields.iter().find(|f| f.name == name).unwrap().kind;
            assert_eq!(kind, FieldKind::NodeList);
        }
        assert_eq!(NodeType::HAnimHumanoid.field_kind("skinCoord"), Some(FieldKind::Node));
        assert_eq!(NodeType::HAnimHumanoid.field_kind("skinNormal"), Some(FieldKind::Node));
    }
}

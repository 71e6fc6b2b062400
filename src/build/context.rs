//! Per-export context: settings plus every cache the build needs.
//!
//! Name deduplication and shared-datablock tracking live here instead of
//! in globals, so concurrent exports of independent scenes cannot
//! interfere; the context is threaded explicitly through the builders.

use std::collections::{HashMap, HashSet};

use crate::encode::Format;
use crate::util::clean_name;

/// Export options, fixed for one run.
#[derive(Clone, Debug)]
pub struct ExportSettings {
    /// Selected output encoding.
    pub format: Format,
    /// Destination file name (used in head metadata and page titles).
    pub filename: String,
    /// Copyright string for head metadata.
    pub copyright: String,
    /// Emit triangle sets instead of polygon face sets.
    pub triangulate: bool,
    /// Export explicit normals.
    pub normals: bool,
    /// Keep parent/child transform hierarchy.
    pub use_hierarchy: bool,
    /// Gzip-compress the written file.
    pub compress: bool,
    /// Prefix declared names by datablock namespace (`OB_`, `ME_`, ...).
    pub name_decorations: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: Format::Xml,
            filename: "scene.x3d".to_string(),
            copyright: String::new(),
            triangulate: false,
            normals: false,
            use_hierarchy: true,
            compress: false,
            name_decorations: true,
        }
    }
}

/// Datablock namespaces used for name decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Object,
    Mesh,
    Material,
    Image,
    World,
    Camera,
    Light,
    /// Undecorated names (hierarchy transforms).
    Plain,
}

impl Namespace {
    fn prefix(&self) -> &'static str {
        match self {
            Namespace::Object => "OB_",
            Namespace::Mesh => "ME_",
            Namespace::Material => "MA_",
            Namespace::Image => "IM_",
            Namespace::World => "WO_",
            Namespace::Camera => "CA_",
            Namespace::Light => "LA_",
            Namespace::Plain => "",
        }
    }
}

/// Per-export state owned by the builders.
pub struct ExportContext {
    pub settings: ExportSettings,
    /// (namespace, datablock key) -> assigned unique name.
    assigned: HashMap<(Namespace, String), String>,
    used_names: HashSet<String>,
    /// Mesh index -> group name, set once the mesh has been exported.
    pub(crate) mesh_groups: HashMap<usize, String>,
    /// Material index -> declared name, set once exported.
    pub(crate) materials_seen: HashMap<usize, String>,
    /// Image index -> declared name, set once exported.
    pub(crate) images_seen: HashMap<usize, String>,
}

impl ExportContext {
    /// Create a context for one export run.
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            assigned: HashMap::new(),
            used_names: HashSet::new(),
            mesh_groups: HashMap::new(),
            materials_seen: HashMap::new(),
            images_seen: HashMap::new(),
        }
    }

    /// Unique declared name for a datablock, stable within the run.
    ///
    /// The first call for a (namespace, key) pair assigns the name;
    /// later calls return the same string. Collisions between distinct
    /// datablocks get numeric suffixes in first-come order.
    pub fn unique_name(&mut self, ns: Namespace, key: impl Into<String>, raw: &str) -> String {
        let key = (ns, key.into());
        if let Some(name) = self.assigned.get(&key) {
            return name.clone();
        }

        let prefix = if self.settings.name_decorations { key.0.prefix() } else { "" };
        let base = format!("{prefix}{}", clean_name(raw));
        let mut candidate = base.clone();
        let mut n = 1;
        while self.used_names.contains(&candidate) {
            candidate = format!("{base}_{n:03}");
            n += 1;
        }
        self.used_names.insert(candidate.clone());
        self.assigned.insert(key, candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_stable_per_key() {
        let mut ctx = ExportContext::new(ExportSettings::default());
        let a = ctx.unique_name(Namespace::Object, "obj:0", "Cube");
        let b = ctx.unique_name(Namespace::Object, "obj:0", "Cube");
        assert_eq!(a, "OB_Cube");
        assert_eq!(a, b);
    }

    #[test]
    fn test_unique_name_collision_suffix() {
        let mut ctx = ExportContext::new(ExportSettings::default());
        let a = ctx.unique_name(Namespace::Object, "obj:0", "Cube");
        let b = ctx.unique_name(Namespace::Object, "obj:1", "Cube");
        assert_eq!(a, "OB_Cube");
        assert_eq!(b, "OB_Cube_001");
    }

    #[test]
    fn test_undecorated_names_share_one_namespace() {
        let mut ctx = ExportContext::new(ExportSettings {
            name_decorations: false,
            ..Default::default()
        });
        let a = ctx.unique_name(Namespace::Object, "obj:0", "Cube");
        let b = ctx.unique_name(Namespace::Mesh, "mesh:0", "Cube");
        assert_eq!(a, "Cube");
        assert_eq!(b, "Cube_001");
    }

    #[test]
    fn test_names_are_cleaned() {
        let mut ctx = ExportContext::new(ExportSettings::default());
        let name = ctx.unique_name(Namespace::Mesh, "mesh:0", "My Mesh.001");
        assert_eq!(name, "ME_My_Mesh_001");
    }
}

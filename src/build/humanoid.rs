//! Humanoid (skeleton) assembly.
//!
//! The skeleton tree declares every joint and site; the humanoid's flat
//! `joints` and `sites` lists then reference them by name. Skin
//! coordinate/normal data lands in the dedicated single-node fields the
//! resolver also walks.

use glam::Vec3;

use crate::scene::{Document, FieldValue, NodeHandle, NodeType};
use crate::util::{clean_name, Result};

use super::scene_data::{HumanoidData, JointData};

fn joint_node(
    doc: &mut Document,
    data: &JointData,
    joint_names: &mut Vec<String>,
    site_names: &mut Vec<String>,
) -> Result<NodeHandle> {
    let joint_id = format!("hanim_{}", clean_name(&data.name));
    joint_names.push(joint_id.clone());

    let joint = doc.create_node(NodeType::HAnimJoint);
    doc.declare(joint, joint_id)?;
    doc.set_field(joint, "name", data.name.clone())?;
    doc.set_field(joint, "center", data.center)?;

    for child in &data.children {
        let child_node = joint_node(doc, child, joint_names, site_names)?;
        doc.append_child(joint, child_node)?;
    }

    if let Some(site) = &data.site {
        let site_id = format!("hanim_{}_site", clean_name(&site.name));
        site_names.push(site_id.clone());
        let site_node = doc.create_node(NodeType::HAnimSite);
        doc.declare(site_node, site_id)?;
        doc.set_field(site_node, "name", site.name.clone())?;
        doc.set_field(site_node, "translation", site.translation)?;
        doc.append_child(joint, site_node)?;
    }

    Ok(joint)
}

/// Build an HAnimHumanoid node from skeleton input.
pub fn humanoid(doc: &mut Document, data: &HumanoidData) -> Result<NodeHandle> {
    let humanoid_id = format!("hanim_{}", clean_name(&data.name));
    let h = doc.create_node(NodeType::HAnimHumanoid);
    doc.declare(h, humanoid_id)?;
    doc.set_field(h, "name", data.name.clone())?;
    doc.set_field(h, "version", "2.0")?;
    doc.set_field(h, "center", Vec3::ZERO)?;

    let mut joint_names = Vec::new();
    let mut site_names = Vec::new();
    let mut skeleton = Vec::new();
    for root in &data.skeleton {
        skeleton.push(joint_node(doc, root, &mut joint_names, &mut site_names)?);
    }
    doc.set_field(h, "skeleton", FieldValue::NodeList(skeleton))?;

    let joints: Vec<NodeHandle> = joint_names
        .iter()
        .map(|n| doc.reference(NodeType::HAnimJoint, n.clone()))
        .collect();
    doc.set_field(h, "joints", FieldValue::NodeList(joints))?;

    if !site_names.is_empty() {
        let sites: Vec<NodeHandle> = site_names
            .iter()
            .map(|n| doc.reference(NodeType::HAnimSite, n.clone()))
            .collect();
        doc.set_field(h, "sites", FieldValue::NodeList(sites))?;
    }

    if let Some(points) = &data.skin_coord {
        let coord = doc.create_node(NodeType::Coordinate);
        doc.set_field(coord, "point", FieldValue::Vec3List(points.clone()))?;
        doc.set_field(h, "skinCoord", coord)?;
    }
    if let Some(vectors) = &data.skin_normal {
        let normal = doc.create_node(NodeType::Normal);
        doc.set_field(normal, "vector", FieldValue::Vec3List(vectors.clone()))?;
        doc.set_field(h, "skinNormal", normal)?;
    }

    if !data.motions.is_empty() {
        let mut motions = Vec::new();
        for motion in &data.motions {
            let m = doc.create_node(NodeType::HAnimMotion);
            doc.set_field(m, "description", motion.description.clone())?;
            doc.set_field(m, "frameCount", motion.frame_count)?;
            doc.set_field(m, "frameDuration", motion.frame_duration)?;
            doc.set_field(m, "values", FieldValue::FloatList(motion.values.clone()))?;
            motions.push(m);
        }
        doc.set_field(h, "motions", FieldValue::NodeList(motions))?;
    }

    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::scene_data::{MotionData, SiteData};
    use crate::scene::resolve;

    fn arm() -> HumanoidData {
        HumanoidData {
            name: "Armature".to_string(),
            skeleton: vec![JointData {
                name: "root".to_string(),
                center: Vec3::ZERO,
                children: vec![JointData {
                    name: "spine".to_string(),
                    center: Vec3::new(0.0, 1.0, 0.0),
                    children: Vec::new(),
                    site: Some(SiteData {
                        name: "spine_tip".to_string(),
                        translation: Vec3::new(0.0, 2.0, 0.0),
                    }),
                }],
                site: None,
            }],
            skin_coord: Some(vec![Vec3::ZERO, Vec3::ONE]),
            skin_normal: None,
            motions: vec![MotionData {
                description: "walk".to_string(),
                frame_count: 2,
                frame_duration: 0.033,
                values: vec![0.0, 0.1, 0.0, 0.0, 0.2, 0.0],
            }],
        }
    }

    #[test]
    fn test_skeleton_declares_joints_list_references() {
        let mut doc = Document::with_root(NodeType::Scene);
        let h = humanoid(&mut doc, &arm()).unwrap();
        doc.append_child(doc.root(), h).unwrap();

        let node = doc.node(h);
        let FieldValue::NodeList(joints) = node.field("joints").unwrap() else { panic!() };
        assert_eq!(joints.len(), 2);
        assert!(doc.node(joints[0]).is_reference());
        assert_eq!(doc.node(joints[0]).reference_name.as_deref(), Some("hanim_root"));

        let FieldValue::NodeList(sites) = node.field("sites").unwrap() else { panic!() };
        assert_eq!(sites.len(), 1);

        let FieldValue::NodeList(motions) = node.field("motions").unwrap() else { panic!() };
        assert_eq!(doc.node(motions[0]).node_type, NodeType::HAnimMotion);

        // Every reference resolves against the skeleton declarations.
        resolve(&mut doc).unwrap();
    }

    #[test]
    fn test_skin_coord_field() {
        let mut doc = Document::with_root(NodeType::Scene);
        let h = humanoid(&mut doc, &arm()).unwrap();
        match doc.node(h).field("skinCoord") {
            Some(FieldValue::Node(coord)) => {
                assert_eq!(doc.node(*coord).node_type, NodeType::Coordinate);
            }
            other => panic!("unexpected skinCoord: {other:?}"),
        }
    }
}

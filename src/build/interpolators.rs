//! Animation wiring: time sensor, interpolators and routes.
//!
//! Keys arrive pre-sampled (normalized times plus per-key positions and
//! axis-angle rotations); this module only builds the nodes and the
//! routes from sensor fraction to interpolator to target transform.

use crate::scene::{Document, FieldValue, NodeHandle, NodeType};
use crate::util::Result;

use super::scene_data::KeyframeTrack;

fn route(
    doc: &mut Document,
    from_node: &str,
    from_field: &str,
    to_node: &str,
    to_field: &str,
) -> Result<NodeHandle> {
    let r = doc.create_node(NodeType::Route);
    doc.set_field(r, "fromNode", from_node)?;
    doc.set_field(r, "fromField", from_field)?;
    doc.set_field(r, "toNode", to_node)?;
    doc.set_field(r, "toField", to_field)?;
    Ok(r)
}

/// Build the animation nodes for one track, in scene-child order:
/// TimeSensor, interpolators, then the routes wiring them together.
pub fn animation_nodes(doc: &mut Document, track: &KeyframeTrack) -> Result<Vec<NodeHandle>> {
    let mut nodes = Vec::new();

    let clock_id = format!("CLOCK_{}", track.target);
    let clock = doc.create_node(NodeType::TimeSensor);
    doc.declare(clock, clock_id.clone())?;
    doc.set_field(clock, "cycleInterval", track.cycle_interval)?;
    doc.set_field(clock, "loop", true)?;
    doc.set_field(clock, "enabled", true)?;
    nodes.push(clock);

    if let Some(positions) = &track.positions {
        let interp_id = format!("POS_INTERP_{}", track.target);
        let interp = doc.create_node(NodeType::PositionInterpolator);
        doc.declare(interp, interp_id.clone())?;
        doc.set_field(interp, "key", FieldValue::FloatList(track.times.clone()))?;
        doc.set_field(interp, "keyValue", FieldValue::Vec3List(positions.clone()))?;
        nodes.push(interp);
        nodes.push(route(doc, &clock_id, "fraction_changed", &interp_id, "set_fraction")?);
        nodes.push(route(doc, &interp_id, "value_changed", &track.target, "set_translation")?);
    }

    if let Some(rotations) = &track.rotations {
        let interp_id = format!("ROT_INTERP_{}", track.target);
        let interp = doc.create_node(NodeType::OrientationInterpolator);
        doc.declare(interp, interp_id.clone())?;
        doc.set_field(interp, "key", FieldValue::FloatList(track.times.clone()))?;
        doc.set_field(interp, "keyValue", FieldValue::Vec4List(rotations.clone()))?;
        nodes.push(interp);
        nodes.push(route(doc, &clock_id, "fraction_changed", &interp_id, "set_fraction")?);
        nodes.push(route(doc, &interp_id, "value_changed", &track.target, "set_rotation")?);
    }

    Ok(nodes)
}

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::engine::NodeGeometry;
use crate::error::{LayoutError, Result};
use crate::model::{POSITION_KEY, Position, Positioned, TierItem};

/// Converts a center-anchored box to its top-left corner.
pub fn top_left(geometry: &NodeGeometry) -> Position {
    Position {
        x: geometry.x - geometry.width / 2.0,
        y: geometry.y - geometry.height / 2.0,
    }
}

/// Attaches positions to one tier's collection, preserving input order.
///
/// A `position` the caller already carried is replaced by the computed one.
/// Fails on the first item without geometry; a partially positioned tier is
/// never returned.
pub fn project_tier<T: TierItem>(
    items: &[T],
    geometry: &BTreeMap<String, NodeGeometry>,
) -> Result<Vec<Positioned<T>>> {
    items
        .iter()
        .map(|item| {
            let id = item.id();
            let geom = geometry
                .get(id)
                .ok_or_else(|| LayoutError::MissingLayoutGeometry { id: id.to_string() })?;
            let mut item = item.clone();
            item.payload_mut().remove(POSITION_KEY);
            Ok(Positioned {
                item,
                position: top_left(geom),
            })
        })
        .collect()
}

/// Width and height of the drawing: the far corner of every placed box plus
/// the configured margins. Empty layouts are 0x0.
pub fn layout_extent<'a, I>(boxes: I, config: &LayoutConfig) -> (f32, f32)
where
    I: IntoIterator<Item = (Position, &'a NodeGeometry)>,
{
    let mut max_x: Option<f32> = None;
    let mut max_y: Option<f32> = None;
    for (pos, geom) in boxes {
        let right = pos.x + geom.width;
        let bottom = pos.y + geom.height;
        max_x = Some(max_x.map_or(right, |m| m.max(right)));
        max_y = Some(max_y.map_or(bottom, |m| m.max(bottom)));
    }
    match (max_x, max_y) {
        (Some(x), Some(y)) => (x + config.margin_x, y + config.margin_y),
        _ => (0.0, 0.0),
    }
}

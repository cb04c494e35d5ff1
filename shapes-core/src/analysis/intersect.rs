//! Which stored polygons does a square intersect?
//!
//! A polygon intersects a square when at least one of its vertices is inside the square's
//! boundary according to [`is_inside`](crate::analysis::contains::is_inside). Polygon edges
//! crossing the square without a vertex inside do not count.

use log::debug;

use crate::{
    analysis::contains::Contains,
    error::ShapeError,
    model::{Polygon, ShapeId, Square},
};

/// Ids of the polygons with a vertex inside `square`, in the order they were found.
///
/// The square's coordinates are parsed before any polygon is looked at. Each polygon is
/// parsed when its turn comes; a malformed one aborts the whole evaluation. Polygons that
/// were never persisted (no id) cannot be recorded and are skipped.
pub fn intersected_polygons(square: &Square, polygons: &[Polygon]) -> Result<Vec<ShapeId>, ShapeError> {
    let boundary = square.boundary()?;
    let mut ids = Vec::new();
    for polygon in polygons {
        let vertices = polygon.vertices()?;
        let Some(hit) = vertices.iter().find(|v| boundary.contains(v)) else {
            continue;
        };
        match polygon.id {
            Some(id) => {
                debug!("{} intersects polygon {} at vertex {}", square, id, hit);
                ids.push(id);
            }
            None => debug!("skipping unsaved {} with vertex {} inside {}", polygon, hit, square),
        }
    }
    Ok(ids)
}

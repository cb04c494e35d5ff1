use derive_more::From;

use crate::{error::ShapeError, geometry::r2::R2, model::Square};

pub trait Contains<O> {
    fn contains(&self, o: &O) -> bool;
}

/// Closed ring of vertices tested with [`is_inside`].
#[derive(Debug, Clone, From, PartialEq, Eq)]
pub struct Boundary {
    pub vertices: Vec<R2<i32>>,
}

/// Ray-casting (even-odd) test of `p` against the closed polygon `vertices`.
///
/// A horizontal ray is cast from `p` towards +x. Edge `i` joins vertex `i` to the previous
/// vertex `j` (the first edge wraps around to the last vertex). The edge toggles `inside`
/// when exactly one endpoint lies strictly below `p.y` and the crossing point, found by
/// integer interpolation, lies strictly left of `p.x`.
///
/// The interpolation is evaluated left to right in integer arithmetic, so the division
/// truncates toward zero before the multiplication. Points on an edge or vertex get
/// whatever answer the crossing rule gives them.
pub fn is_inside(p: &R2<i32>, vertices: &[R2<i32>]) -> bool {
    let p: R2<i64> = (*p).into();
    let n = vertices.len();
    let mut inside = false;
    if n == 0 {
        return inside;
    }
    let mut j = n - 1;
    for i in 0..n {
        let vi: R2<i64> = vertices[i].into();
        let vj: R2<i64> = vertices[j].into();
        // Straddling guarantees vi.y != vj.y, so the division below is never by zero.
        let straddles = (vi.y < p.y && vj.y >= p.y) || (vj.y < p.y && vi.y >= p.y);
        if straddles && vi.x + (p.y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x) < p.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Contains<R2<i32>> for Boundary {
    fn contains(&self, p: &R2<i32>) -> bool {
        is_inside(p, &self.vertices)
    }
}

impl Square {
    pub fn boundary(&self) -> Result<Boundary, ShapeError> {
        Ok(Boundary::from(self.vertices()?))
    }

    /// Parse this square's boundary and test `p` against it.
    pub fn contains_point(&self, p: &R2<i32>) -> Result<bool, ShapeError> {
        Ok(self.boundary()?.contains(p))
    }
}

use std::fmt::{Display, Formatter, self};

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct R2<D> {
    pub x: D,
    pub y: D,
}

impl<D> R2<D> {
    pub fn new(x: D, y: D) -> Self {
        R2 { x, y }
    }
}

impl<D: Display> Display for R2<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<R2<i32>> for R2<i64> {
    fn from(p: R2<i32>) -> Self {
        R2 { x: p.x as i64, y: p.y as i64 }
    }
}

impl<D> From<(D, D)> for R2<D> {
    fn from((x, y): (D, D)) -> Self {
        R2 { x, y }
    }
}

pub mod contains;
pub mod intersect;

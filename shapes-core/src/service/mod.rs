pub mod polygon;
pub mod square;

pub use polygon::{PolygonLister, PolygonService};
pub use square::SquareService;

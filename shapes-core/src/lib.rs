pub mod analysis;
pub mod error;
pub mod geometry;
pub mod model;
pub mod service;
pub mod store;

// Re-exports for the binaries
pub use analysis::contains::{is_inside, Boundary, Contains};
pub use analysis::intersect::intersected_polygons;
pub use error::{ShapeError, StoreError};
pub use geometry::coords::{parse_coords, parse_vertices};
pub use geometry::r2::R2;
pub use model::{Entity, Polygon, ShapeId, Square};
pub use service::{PolygonLister, PolygonService, SquareService};
pub use store::{MemoryRepo, Repo};

/// Parse a log level string into LevelFilter.
pub fn parse_log_level(level: Option<&str>) -> Result<log::LevelFilter, ShapeError> {
    match level {
        Some("error") => Ok(log::LevelFilter::Error),
        Some("warn") => Ok(log::LevelFilter::Warn),
        Some("info") | Some("") | None => Ok(log::LevelFilter::Info),
        Some("debug") => Ok(log::LevelFilter::Debug),
        Some("trace") => Ok(log::LevelFilter::Trace),
        Some(level) => Err(ShapeError::InvalidLogLevel(level.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level(None), Ok(log::LevelFilter::Info));
        assert_eq!(parse_log_level(Some("")), Ok(log::LevelFilter::Info));
        assert_eq!(parse_log_level(Some("debug")), Ok(log::LevelFilter::Debug));
        assert!(parse_log_level(Some("loud")).is_err());
    }
}

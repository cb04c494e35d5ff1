use crate::model::ShapeId;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("invalid X/Y coordinate format: {0}")]
    CoordinateFormat(String),

    #[error("{0}")]
    Persistence(String),

    #[error("No shape with id {0}")]
    NotFound(ShapeId),

    #[error("Shape has no id")]
    MissingId,

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("No record with id {0}")]
    NotFound(ShapeId),

    #[error("No ids left after {0}")]
    IdsExhausted(ShapeId),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Store I/O failed: {0}")]
    Io(String),
}

impl ShapeError {
    /// Wrap a storage failure with a description of the operation that hit it.
    pub fn persistence(context: &str, err: StoreError) -> ShapeError {
        match err {
            StoreError::NotFound(id) => ShapeError::NotFound(id),
            err => ShapeError::Persistence(format!("{}: {}", context, err)),
        }
    }
}

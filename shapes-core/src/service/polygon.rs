use std::sync::{Mutex, MutexGuard};

use log::info;

use crate::{
    error::ShapeError,
    model::{Polygon, ShapeId},
    store::Repo,
};

/// Source of candidate polygons for intersection tests.
pub trait PolygonLister {
    fn list(&self) -> Result<Vec<Polygon>, ShapeError>;
}

impl<P: PolygonLister + ?Sized> PolygonLister for std::sync::Arc<P> {
    fn list(&self) -> Result<Vec<Polygon>, ShapeError> {
        (**self).list()
    }
}

/// Plain CRUD over stored polygons. Coordinates are stored as given; a malformed polygon
/// only surfaces as an error when a square is evaluated against it.
pub struct PolygonService<R> {
    repo: R,
    writes: Mutex<()>,
}

impl<R: Repo<Polygon>> PolygonService<R> {
    pub fn new(repo: R) -> Self {
        PolygonService { repo, writes: Mutex::new(()) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, ShapeError> {
        self.writes.lock().map_err(|_| ShapeError::Persistence("polygon writer lock poisoned".to_string()))
    }

    pub fn create(&self, polygon: Polygon) -> Result<Polygon, ShapeError> {
        let polygon = Polygon { id: None, ..polygon };
        let saved = self.repo.save(polygon).map_err(|e| ShapeError::persistence("failed to save polygon", e))?;
        info!("Saved {}", saved);
        Ok(saved)
    }

    pub fn get(&self, id: ShapeId) -> Result<Polygon, ShapeError> {
        self.repo
            .find_by_id(id)
            .map_err(|e| ShapeError::persistence("failed to load polygon", e))?
            .ok_or(ShapeError::NotFound(id))
    }

    /// Replace a stored polygon; unknown ids are [`ShapeError::NotFound`].
    pub fn update(&self, polygon: Polygon) -> Result<Polygon, ShapeError> {
        let id = polygon.id.ok_or(ShapeError::MissingId)?;
        let _guard = self.lock()?;
        self.get(id)?;
        self.repo.save(polygon).map_err(|e| ShapeError::persistence("failed to update polygon", e))
    }

    pub fn delete(&self, id: ShapeId) -> Result<(), ShapeError> {
        let _guard = self.lock()?;
        self.repo.delete_by_id(id).map_err(|e| ShapeError::persistence("failed to delete polygon", e))
    }
}

impl<R: Repo<Polygon>> PolygonLister for PolygonService<R> {
    fn list(&self) -> Result<Vec<Polygon>, ShapeError> {
        self.repo.find_all().map_err(|e| ShapeError::persistence("failed to list polygons", e))
    }
}

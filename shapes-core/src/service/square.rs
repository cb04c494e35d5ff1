//! Square CRUD, with intersection evaluation on create.

use std::sync::{Mutex, MutexGuard};

use log::{error, info};

use crate::{
    analysis::intersect::intersected_polygons,
    error::ShapeError,
    model::{ShapeId, Square},
    service::polygon::PolygonLister,
    store::Repo,
};

pub struct SquareService<R, P> {
    repo: R,
    polygons: P,
    /// Held across each write so a square's two saves never interleave with another writer.
    writes: Mutex<()>,
}

impl<R: Repo<Square>, P: PolygonLister> SquareService<R, P> {
    pub fn new(repo: R, polygons: P) -> Self {
        SquareService { repo, polygons, writes: Mutex::new(()) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, ShapeError> {
        self.writes.lock().map_err(|_| ShapeError::Persistence("square writer lock poisoned".to_string()))
    }

    /// Save `square`, evaluate it against every known polygon, and save it again with the
    /// intersected polygon ids.
    ///
    /// The two saves are not atomic: if the second one fails, the square stays stored with
    /// an empty polygon list.
    pub fn create(&self, square: Square) -> Result<Square, ShapeError> {
        self.try_create(square).map_err(|e| {
            error!("Error saving square: {}", e);
            e
        })
    }

    fn try_create(&self, square: Square) -> Result<Square, ShapeError> {
        // Reject bad coordinates before anything is persisted.
        square.vertices()?;
        let _guard = self.lock()?;

        let square = Square { id: None, polygons: vec![], ..square };
        let saved = self.repo.save(square).map_err(|e| ShapeError::persistence("failed to save square", e))?;
        info!("Saved {}", saved);

        let polygons = self.polygons.list()?;
        let ids = intersected_polygons(&saved, &polygons)?;
        if ids.is_empty() {
            info!("No intersected polygons for square {:?}", saved.id);
        } else {
            info!("Square {:?} intersects polygons {:?}", saved.id, ids);
        }
        self.repo
            .save(Square { polygons: ids, ..saved })
            .map_err(|e| ShapeError::persistence("failed to save square", e))
    }

    pub fn list(&self) -> Result<Vec<Square>, ShapeError> {
        self.repo.find_all().map_err(|e| ShapeError::persistence("failed to list squares", e))
    }

    pub fn get(&self, id: ShapeId) -> Result<Square, ShapeError> {
        self.repo
            .find_by_id(id)
            .map_err(|e| ShapeError::persistence("failed to load square", e))?
            .ok_or(ShapeError::NotFound(id))
    }

    /// Replace a stored square with `square`. Its polygon list is not re-evaluated.
    pub fn update(&self, square: Square) -> Result<Square, ShapeError> {
        let id = square.id.ok_or(ShapeError::MissingId)?;
        let _guard = self.lock()?;
        self.get(id)?;
        self.repo.save(square).map_err(|e| ShapeError::persistence("failed to update square", e))
    }

    pub fn delete(&self, id: ShapeId) -> Result<(), ShapeError> {
        let _guard = self.lock()?;
        self.repo.delete_by_id(id).map_err(|e| ShapeError::persistence("failed to delete square", e))
    }
}

//! Storage collaborator: generic save / find / delete by identifier.

pub mod memory;

use crate::{error::StoreError, model::{Entity, ShapeId}};

pub use memory::MemoryRepo;

pub trait Repo<T: Entity> {
    /// Persist `item`. An item without an id is assigned the next one; an item with an id
    /// replaces whatever is stored under it. Returns the stored item.
    fn save(&self, item: T) -> Result<T, StoreError>;
    fn find_all(&self) -> Result<Vec<T>, StoreError>;
    fn find_by_id(&self, id: ShapeId) -> Result<Option<T>, StoreError>;
    fn delete_by_id(&self, id: ShapeId) -> Result<(), StoreError>;
}

impl<T: Entity, R: Repo<T> + ?Sized> Repo<T> for std::sync::Arc<R> {
    fn save(&self, item: T) -> Result<T, StoreError> {
        (**self).save(item)
    }
    fn find_all(&self) -> Result<Vec<T>, StoreError> {
        (**self).find_all()
    }
    fn find_by_id(&self, id: ShapeId) -> Result<Option<T>, StoreError> {
        (**self).find_by_id(id)
    }
    fn delete_by_id(&self, id: ShapeId) -> Result<(), StoreError> {
        (**self).delete_by_id(id)
    }
}

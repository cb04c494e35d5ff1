use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicI32, Ordering},
        RwLock,
    },
};

use log::trace;

use crate::{
    error::StoreError,
    model::{Entity, ShapeId},
    store::Repo,
};

/// In-memory [`Repo`], ids assigned from 1 upwards.
#[derive(Debug)]
pub struct MemoryRepo<T> {
    items: RwLock<BTreeMap<ShapeId, T>>,
    next_id: AtomicI32,
}

impl<T> Default for MemoryRepo<T> {
    fn default() -> Self {
        MemoryRepo {
            items: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

impl<T: Entity> MemoryRepo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with previously persisted items. Items without an id are assigned one;
    /// the sequence continues after the largest id seen.
    pub fn from_items(items: Vec<T>) -> Result<Self, StoreError> {
        let repo = Self::new();
        for item in items.iter().filter(|item| item.id().is_some()) {
            repo.save(item.clone())?;
        }
        for item in items.into_iter().filter(|item| item.id().is_none()) {
            repo.save(item)?;
        }
        Ok(repo)
    }

    /// Take the next id from the sequence.
    fn assign_id(&self) -> Result<ShapeId, StoreError> {
        self.next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map_err(StoreError::IdsExhausted)
    }
}

impl<T: Entity> Repo<T> for MemoryRepo<T> {
    fn save(&self, item: T) -> Result<T, StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        let item = match item.id() {
            Some(id) => {
                // Keep the sequence ahead of explicitly chosen ids.
                let after = id.checked_add(1).ok_or(StoreError::IdsExhausted(id))?;
                self.next_id.fetch_max(after, Ordering::SeqCst);
                item
            }
            None => item.with_id(self.assign_id()?),
        };
        let id = item.id().ok_or_else(|| StoreError::Io("entity dropped its id".to_string()))?;
        trace!("save {}", id);
        items.insert(id, item.clone());
        Ok(item)
    }

    fn find_all(&self) -> Result<Vec<T>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
        Ok(items.values().cloned().collect())
    }

    fn find_by_id(&self, id: ShapeId) -> Result<Option<T>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(&id).cloned())
    }

    fn delete_by_id(&self, id: ShapeId) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        items.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Polygon;

    #[test]
    fn test_save_assigns_ids() {
        let repo = MemoryRepo::new();
        let a = repo.save(Polygon::new(&[1, 2, 3], &[1, 2, 1])).unwrap();
        let b = repo.save(Polygon::new(&[4, 5, 6], &[1, 2, 1])).unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(repo.find_all().unwrap(), vec![a, b]);
    }

    #[test]
    fn test_save_existing_replaces() {
        let repo = MemoryRepo::new();
        let a = repo.save(Polygon::new(&[1, 2, 3], &[1, 2, 1])).unwrap();
        let updated = Polygon { x_points: "7,8,9".to_string(), ..a.clone() };
        repo.save(updated.clone()).unwrap();
        assert_eq!(repo.find_all().unwrap(), vec![updated.clone()]);
        assert_eq!(repo.find_by_id(1).unwrap(), Some(updated));
        assert_eq!(repo.find_by_id(2).unwrap(), None);
    }

    #[test]
    fn test_explicit_id_advances_sequence() {
        let repo = MemoryRepo::new();
        repo.save(Polygon::new(&[1], &[1]).with_id(10)).unwrap();
        let next = repo.save(Polygon::new(&[2], &[2])).unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[test]
    fn test_delete() {
        let repo = MemoryRepo::new();
        repo.save(Polygon::new(&[1, 2, 3], &[1, 2, 1])).unwrap();
        assert_eq!(repo.delete_by_id(1), Ok(()));
        assert_eq!(repo.delete_by_id(1), Err(StoreError::NotFound(1)));
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_from_items() {
        let repo = MemoryRepo::from_items(vec![
            Polygon::new(&[2], &[2]),
            Polygon::new(&[1], &[1]).with_id(4),
        ]).unwrap();
        let ids: Vec<_> = repo.find_all().unwrap().into_iter().filter_map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(repo.save(Polygon::new(&[3], &[3])).unwrap().id, Some(6));
    }

    #[test]
    fn test_id_sequence_exhausted() {
        let repo = MemoryRepo::new();
        assert_eq!(
            repo.save(Polygon::new(&[1], &[1]).with_id(ShapeId::MAX)),
            Err(StoreError::IdsExhausted(ShapeId::MAX)),
        );
        repo.save(Polygon::new(&[1], &[1]).with_id(ShapeId::MAX - 1)).unwrap();
        assert_eq!(repo.save(Polygon::new(&[2], &[2])), Err(StoreError::IdsExhausted(ShapeId::MAX)));
        assert_eq!(repo.find_all().unwrap().len(), 1);
        assert!(MemoryRepo::from_items(vec![Polygon::new(&[1], &[1]).with_id(ShapeId::MAX)]).is_err());
    }
}

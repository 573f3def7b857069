use std::collections::HashMap;

use super::entity::{Entity, EntityId};
use super::error::{SimError, SimResult};

/// Identity-indexed entity container.
///
/// Holds at most one entity per id and iterates in insertion order, so
/// snapshots and collision scans are deterministic across ticks.
#[derive(Debug, Clone, Default)]
pub struct EntityCollection {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Rejects a second entity with an id already present.
    pub fn add(&mut self, entity: Entity) -> SimResult<()> {
        let id = entity.id();
        if self.contains(id) {
            return Err(SimError::IdConflict(id));
        }
        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    /// Removes the entry with the same identity as `entity`.
    pub fn delete(&mut self, entity: &Entity) -> Option<Entity> {
        self.delete_id(entity.id())
    }

    pub fn delete_id(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.index.remove(&id)?;
        let removed = self.entities.remove(slot);
        for entity in &self.entities[slot..] {
            if let Some(position) = self.index.get_mut(&entity.id()) {
                *position -= 1;
            }
        }
        Some(removed)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|slot| &self.entities[*slot])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = *self.index.get(&id)?;
        self.entities.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(Entity::id).collect()
    }

    /// Copies the matching entities into a new collection.
    pub fn filter<P>(&self, predicate: P) -> EntityCollection
    where
        P: Fn(&Entity) -> bool,
    {
        let mut filtered = EntityCollection::new();
        for entity in self.entities.iter().filter(|entity| predicate(entity)) {
            filtered.index.insert(entity.id(), filtered.entities.len());
            filtered.entities.push(entity.clone());
        }
        filtered
    }

    /// Ids of the matching entities, in insertion order.
    pub fn filter_ids<P>(&self, predicate: P) -> Vec<EntityId>
    where
        P: Fn(&Entity) -> bool,
    {
        self.entities
            .iter()
            .filter(|entity| predicate(entity))
            .map(Entity::id)
            .collect()
    }
}

impl<'a> IntoIterator for &'a EntityCollection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

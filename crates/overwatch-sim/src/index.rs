//! Lookup from scenario entity ids to ECS handles.

use std::collections::HashMap;

use hecs::Entity;

use overwatch_core::types::EntityId;

/// Entities are never despawned, so a handle stays valid for the whole
/// mission. Iteration follows spawn order.
#[derive(Debug, Default)]
pub struct EntityIndex {
    handles: HashMap<EntityId, Entity>,
    order: Vec<(EntityId, Entity)>,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a spawned entity. Returns `false` if the id is taken.
    pub fn insert(&mut self, id: EntityId, handle: Entity) -> bool {
        if self.handles.contains_key(&id) {
            return false;
        }
        self.handles.insert(id.clone(), handle);
        self.order.push((id, handle));
        true
    }

    pub fn get(&self, id: &EntityId) -> Option<Entity> {
        self.handles.get(id).copied()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.handles.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, Entity)> {
        self.order.iter().map(|(id, h)| (id, *h))
    }

    pub fn handles(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().map(|(_, h)| *h)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
        self.order.clear();
    }
}

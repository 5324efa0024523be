//! In-memory world backend.
//!
//! Reference implementation of [`WorldView`] used by the simulation driver
//! and the test suites. Entities are rows in a locked table; hostility is a
//! faction comparison. A production embedding replaces this with an adapter
//! over the host game state.

use std::collections::HashMap;
use std::sync::RwLock;

use agent_core::{EntityId, Position, WorldView};

#[derive(Clone, Copy, Debug)]
struct EntityState {
    position: Position,
    health: f64,
    faction: u8,
}

/// Locked entity table implementing [`WorldView`].
#[derive(Default)]
pub struct InMemoryWorld {
    entities: RwLock<HashMap<EntityId, EntityState>>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity. Re-spawning an existing id overwrites its state.
    pub fn spawn(&self, entity: EntityId, position: Position, health: f64, faction: u8) {
        self.write().insert(
            entity,
            EntityState {
                position,
                health,
                faction,
            },
        );
    }

    /// Removes an entity. Unknown ids are ignored.
    pub fn despawn(&self, entity: EntityId) {
        self.write().remove(&entity);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<EntityId, EntityState>> {
        self.entities.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<EntityId, EntityState>> {
        self.entities.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl WorldView for InMemoryWorld {
    fn location_of(&self, entity: EntityId) -> Option<Position> {
        self.read().get(&entity).map(|state| state.position)
    }

    fn nearby_entities(&self, origin: Position, radius: f64) -> Vec<EntityId> {
        self.read()
            .iter()
            .filter(|(_, state)| origin.distance(state.position) <= radius)
            .map(|(&entity, _)| entity)
            .collect()
    }

    fn is_alive(&self, entity: EntityId) -> bool {
        self.read()
            .get(&entity)
            .is_some_and(|state| state.health > 0.0)
    }

    fn health_of(&self, entity: EntityId) -> Option<f64> {
        self.read().get(&entity).map(|state| state.health)
    }

    fn is_hostile(&self, entity: EntityId, other: EntityId) -> bool {
        let entities = self.read();
        match (entities.get(&entity), entities.get(&other)) {
            (Some(a), Some(b)) => a.faction != b.faction,
            _ => false,
        }
    }

    fn apply_move(&self, entity: EntityId, to: Position) {
        if let Some(state) = self.write().get_mut(&entity) {
            state.position = to;
        }
    }

    fn apply_damage(&self, attacker: EntityId, target: EntityId, amount: f64) {
        if let Some(state) = self.write().get_mut(&target) {
            state.health = (state.health - amount).max(0.0);
            tracing::trace!(%attacker, %target, amount, remaining = state.health, "damage applied");
        }
    }
}

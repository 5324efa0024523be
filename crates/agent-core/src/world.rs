//! The world boundary.
//!
//! The simulation core never owns or mutates world state directly: every
//! observation and effect flows through this narrow trait. Cross-agent
//! effects applied here become observable to other agents on the *next*
//! tick, which is what keeps per-tick agent execution independent.

use crate::ids::EntityId;
use crate::position::Position;

/// Read/effect interface onto the external world.
///
/// Implementations carry their own interior mutability (methods take
/// `&self`) and their own synchronization; the core treats the world as a
/// shared collaborator that may be consulted from the simulation thread and
/// from command-handling threads.
///
/// All query methods are fallible by absence: an entity that has despawned
/// simply stops resolving, and callers translate that into local `Failure`
/// handling rather than errors.
pub trait WorldView: Send + Sync {
    /// Current location of an entity, if it still exists.
    fn location_of(&self, entity: EntityId) -> Option<Position>;

    /// All entities within `radius` of `origin`, excluding none.
    fn nearby_entities(&self, origin: Position, radius: f64) -> Vec<EntityId>;

    /// Whether the entity exists and is alive.
    fn is_alive(&self, entity: EntityId) -> bool;

    /// Current health of an entity, if it still exists.
    fn health_of(&self, entity: EntityId) -> Option<f64>;

    /// Whether `other` is hostile toward `entity`.
    ///
    /// Target selection only considers hostile candidates; a world without
    /// factions can simply report every non-agent as hostile.
    fn is_hostile(&self, entity: EntityId, other: EntityId) -> bool;

    /// Requests that `entity` be moved to `to`.
    ///
    /// The world is free to clamp or reject the move; the new location is
    /// observed through [`WorldView::location_of`] on the next tick.
    fn apply_move(&self, entity: EntityId, to: Position);

    /// Requests that `attacker` deal `amount` damage to `target`.
    fn apply_damage(&self, attacker: EntityId, target: EntityId, amount: f64);
}

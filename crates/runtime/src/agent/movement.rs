//! Straight-line movement.
//!
//! The controller holds at most one destination. Each tick it advances the
//! agent one step along the unit direction vector, scaled by the urgency
//! boost and the waiting-for-group slowdown, and asks the world to apply the
//! move. Reaching the destination (distance below the arrival threshold)
//! clears it and returns the controller to idle.

use agent_core::{EntityId, Position, WorldView};

use crate::config::MovementConfig;

/// Per-agent movement subsystem.
pub struct MovementController {
    destination: Option<Position>,
    speed: f64,
    arrival_threshold: f64,
    urgency_multiplier: f64,
    slow_multiplier: f64,
    urgent: bool,
    waiting_for_group: bool,
}

impl MovementController {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            destination: None,
            speed: config.speed,
            arrival_threshold: config.arrival_threshold,
            urgency_multiplier: config.urgency_multiplier,
            slow_multiplier: config.slow_multiplier,
            urgent: false,
            waiting_for_group: false,
        }
    }

    /// Sets the destination for subsequent ticks.
    pub fn move_to(&mut self, destination: Position) {
        self.destination = Some(destination);
    }

    /// Drops the destination without reaching it.
    pub fn clear_destination(&mut self) {
        self.destination = None;
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    pub fn is_moving(&self) -> bool {
        self.destination.is_some()
    }

    /// Temporary speed boost for priority moves. Cleared on arrival.
    pub fn set_urgent(&mut self, urgent: bool) {
        self.urgent = urgent;
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Temporary slowdown so the rest of the group can catch up.
    pub fn set_waiting_for_group(&mut self, waiting: bool) {
        self.waiting_for_group = waiting;
    }

    pub fn is_waiting_for_group(&self) -> bool {
        self.waiting_for_group
    }

    /// Distance below which a destination counts as reached.
    pub fn arrival_threshold(&self) -> f64 {
        self.arrival_threshold
    }

    /// Advances toward the destination, if one is set. Returns true when the
    /// destination was reached this tick.
    pub fn tick(&mut self, me: EntityId, origin: Position, world: &dyn WorldView) -> bool {
        let Some(destination) = self.destination else {
            return false;
        };

        if origin.distance(destination) <= self.arrival_threshold {
            tracing::trace!(agent = %me, %destination, "destination reached");
            self.destination = None;
            self.urgent = false;
            return true;
        }

        let mut step = self.speed;
        if self.urgent {
            step *= self.urgency_multiplier;
        }
        if self.waiting_for_group {
            step *= self.slow_multiplier;
        }

        let next = origin.step_toward(destination, step);
        world.apply_move(me, next);
        false
    }

    /// Drops all movement state. Part of agent reset.
    pub fn reset(&mut self) {
        self.destination = None;
        self.urgent = false;
        self.waiting_for_group = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::InMemoryWorld;

    fn controller() -> MovementController {
        MovementController::new(&MovementConfig {
            speed: 1.0,
            arrival_threshold: 0.5,
            urgency_multiplier: 2.0,
            slow_multiplier: 0.5,
        })
    }

    #[test]
    fn advances_one_scaled_step_per_tick() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        world.spawn(me, Position::ORIGIN, 100.0, 0);

        let mut movement = controller();
        movement.move_to(Position::new(10.0, 0.0, 0.0));
        movement.tick(me, Position::ORIGIN, &world);
        assert_eq!(world.location_of(me).unwrap().x, 1.0);

        movement.set_urgent(true);
        movement.tick(me, world.location_of(me).unwrap(), &world);
        assert_eq!(world.location_of(me).unwrap().x, 3.0);
    }

    #[test]
    fn waiting_for_group_halves_the_step() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        world.spawn(me, Position::ORIGIN, 100.0, 0);

        let mut movement = controller();
        movement.move_to(Position::new(10.0, 0.0, 0.0));
        movement.set_waiting_for_group(true);
        movement.tick(me, Position::ORIGIN, &world);
        assert_eq!(world.location_of(me).unwrap().x, 0.5);
    }

    #[test]
    fn arrival_clears_destination_and_urgency() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        let near = Position::new(0.2, 0.0, 0.0);
        world.spawn(me, Position::ORIGIN, 100.0, 0);

        let mut movement = controller();
        movement.move_to(near);
        movement.set_urgent(true);

        assert!(movement.tick(me, Position::ORIGIN, &world));
        assert!(!movement.is_moving());
        assert!(!movement.is_urgent());
    }

    #[test]
    fn idle_tick_is_a_no_op() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        world.spawn(me, Position::ORIGIN, 100.0, 0);

        let mut movement = controller();
        assert!(!movement.tick(me, Position::ORIGIN, &world));
        assert_eq!(world.location_of(me).unwrap(), Position::ORIGIN);
    }
}

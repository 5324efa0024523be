//! High-level mode state machine.
//!
//! Modes arbitrate between the subsystems at a coarser grain than the
//! behavior tree: Combat preempts every other mode whenever a target exists,
//! and the remaining modes hold placeholder steering logic (patrol points
//! around an anchor, random exploration, position holding, escort
//! following). Group coordination steers individual members through the
//! explicit mode setters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use agent_core::{EntityId, Position, WorldView};

use crate::config::ModeConfig;

use super::movement::MovementController;

/// Agent operating mode.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum Mode {
    #[default]
    Idle,
    Combat,
    Patrol,
    Explore,
    Defend,
    Escort,
}

/// Per-agent mode state machine.
pub struct BehaviorController {
    mode: Mode,
    anchor: Position,
    escort_target: Option<EntityId>,
    patrol_radius: f64,
    explore_radius: f64,
    defend_radius: f64,
    escort_distance: f64,
    flee_distance: f64,
    rng: StdRng,
}

impl BehaviorController {
    /// Creates the controller. The RNG is seeded from the agent id so runs
    /// stay reproducible.
    pub fn new(config: &ModeConfig, seed: u64) -> Self {
        Self {
            mode: Mode::Idle,
            anchor: Position::ORIGIN,
            escort_target: None,
            patrol_radius: config.patrol_radius,
            explore_radius: config.explore_radius,
            defend_radius: config.defend_radius,
            escort_distance: config.escort_distance,
            flee_distance: config.flee_distance,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Anchor for patrol/defend steering.
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// Distance moved away from a threat when fleeing.
    pub fn flee_distance(&self) -> f64 {
        self.flee_distance
    }

    // ------------------------------------------------------------------
    // Explicit transitions (also the group coordinator's steering surface)
    // ------------------------------------------------------------------

    pub fn set_idle_mode(&mut self) {
        self.transition(Mode::Idle);
    }

    pub fn set_combat_mode(&mut self) {
        self.transition(Mode::Combat);
    }

    pub fn set_patrol_mode(&mut self, anchor: Position) {
        self.anchor = anchor;
        self.transition(Mode::Patrol);
    }

    pub fn set_explore_mode(&mut self, anchor: Position) {
        self.anchor = anchor;
        self.transition(Mode::Explore);
    }

    pub fn set_defend_mode(&mut self, anchor: Position) {
        self.anchor = anchor;
        self.transition(Mode::Defend);
    }

    pub fn set_escort_mode(&mut self, charge: EntityId) {
        self.escort_target = Some(charge);
        self.transition(Mode::Escort);
    }

    /// Restores a persisted mode without running transition logic.
    pub fn restore_mode(&mut self, mode: Mode, anchor: Position) {
        self.mode = mode;
        self.anchor = anchor;
    }

    fn transition(&mut self, next: Mode) {
        if self.mode != next {
            tracing::debug!(from = %self.mode, to = %next, "mode transition");
            self.mode = next;
        }
    }

    /// Runs one tick of the active mode's placeholder logic.
    ///
    /// Combat preemption comes first: any existing target forces Combat, and
    /// Combat with no target falls back to Idle.
    pub fn tick(
        &mut self,
        origin: Position,
        has_target: bool,
        movement: &mut MovementController,
        world: &dyn WorldView,
    ) {
        if has_target && self.mode != Mode::Combat {
            self.transition(Mode::Combat);
        }

        match self.mode {
            Mode::Idle => {}
            Mode::Combat => {
                // Steering is owned by the combat controller; this mode only
                // reconciles the flag once the fight is over.
                if !has_target {
                    self.transition(Mode::Idle);
                }
            }
            Mode::Patrol => {
                if !movement.is_moving() {
                    let next = self.random_point_near(self.anchor, self.patrol_radius);
                    movement.move_to(next);
                }
            }
            Mode::Explore => {
                if !movement.is_moving() {
                    let next = self.random_point_near(origin, self.explore_radius);
                    movement.move_to(next);
                }
            }
            Mode::Defend => {
                if origin.distance(self.anchor) > self.defend_radius {
                    movement.move_to(self.anchor);
                }
            }
            Mode::Escort => match self.escort_target.and_then(|e| world.location_of(e)) {
                Some(charge_pos) => {
                    if origin.distance(charge_pos) > self.escort_distance {
                        movement.move_to(charge_pos);
                    }
                }
                None => {
                    // The charge is gone; nothing left to escort.
                    self.escort_target = None;
                    self.transition(Mode::Idle);
                }
            },
        }
    }

    /// Uniform random point in the disc of `radius` around `center`.
    fn random_point_near(&mut self, center: Position, radius: f64) -> Position {
        let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let distance = self.rng.gen_range(0.0..=radius);
        center.offset(angle.cos() * distance, 0.0, angle.sin() * distance)
    }

    /// Returns to Idle and drops steering state. Part of agent reset.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.escort_target = None;
        self.anchor = Position::ORIGIN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MovementConfig;
    use crate::world::InMemoryWorld;

    fn controller() -> BehaviorController {
        BehaviorController::new(&ModeConfig::default(), 7)
    }

    #[test]
    fn combat_preempts_other_modes() {
        let world = InMemoryWorld::new();
        let mut movement = MovementController::new(&MovementConfig::default());
        let mut modes = controller();
        modes.set_patrol_mode(Position::ORIGIN);

        modes.tick(Position::ORIGIN, true, &mut movement, &world);
        assert_eq!(modes.mode(), Mode::Combat);
    }

    #[test]
    fn combat_without_target_falls_back_to_idle() {
        let world = InMemoryWorld::new();
        let mut movement = MovementController::new(&MovementConfig::default());
        let mut modes = controller();
        modes.set_combat_mode();

        modes.tick(Position::ORIGIN, false, &mut movement, &world);
        assert_eq!(modes.mode(), Mode::Idle);
    }

    #[test]
    fn patrol_issues_waypoints_within_radius() {
        let world = InMemoryWorld::new();
        let mut movement = MovementController::new(&MovementConfig::default());
        let mut modes = controller();
        let anchor = Position::new(100.0, 0.0, 100.0);
        modes.set_patrol_mode(anchor);

        modes.tick(anchor, false, &mut movement, &world);
        let dest = movement.destination().expect("patrol should pick a waypoint");
        assert!(anchor.distance(dest) <= ModeConfig::default().patrol_radius + 1e-9);
    }

    #[test]
    fn defend_holds_the_anchor() {
        let world = InMemoryWorld::new();
        let mut movement = MovementController::new(&MovementConfig::default());
        let mut modes = controller();
        let anchor = Position::ORIGIN;
        modes.set_defend_mode(anchor);

        // Inside the defend radius: stay put.
        modes.tick(Position::new(1.0, 0.0, 0.0), false, &mut movement, &world);
        assert!(movement.destination().is_none());

        // Drifted out: return to the anchor.
        modes.tick(Position::new(20.0, 0.0, 0.0), false, &mut movement, &world);
        assert_eq!(movement.destination(), Some(anchor));
    }

    #[test]
    fn escort_follows_the_charge_and_idles_when_it_vanishes() {
        let world = InMemoryWorld::new();
        let charge = EntityId(9);
        world.spawn(charge, Position::new(30.0, 0.0, 0.0), 100.0, 0);

        let mut movement = MovementController::new(&MovementConfig::default());
        let mut modes = controller();
        modes.set_escort_mode(charge);

        modes.tick(Position::ORIGIN, false, &mut movement, &world);
        assert_eq!(movement.destination(), Some(Position::new(30.0, 0.0, 0.0)));

        world.despawn(charge);
        modes.tick(Position::ORIGIN, false, &mut movement, &world);
        assert_eq!(modes.mode(), Mode::Idle);
    }
}

//! Combat control.
//!
//! A small state machine over Idle, Approaching, and Attacking. With no
//! valid target the controller leaves combat and clears the selector. With a
//! target outside attack range it delegates to movement to close distance.
//! In range, it attacks whenever the cooldown has elapsed, provided the
//! line-of-sight approximation (a short maximum distance) holds and the
//! target is still alive.

use agent_core::{EntityId, Position, WorldView};

use crate::config::CombatConfig;
use crate::events::{self, DecisionAction, Event, EventBus, Experience};

use super::movement::MovementController;
use super::targeting::TargetSelector;

/// Combat posture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
pub enum CombatState {
    #[default]
    Idle,
    Approaching,
    Attacking,
}

/// Per-agent combat subsystem.
pub struct CombatController {
    state: CombatState,
    attack_range: f64,
    attack_damage: f64,
    cooldown_ms: u64,
    los_range: f64,
    last_attack_ms: Option<u64>,
}

impl CombatController {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            state: CombatState::Idle,
            attack_range: config.attack_range,
            attack_damage: config.attack_damage,
            cooldown_ms: config.cooldown_ms,
            los_range: config.los_range,
            last_attack_ms: None,
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn attack_range(&self) -> f64 {
        self.attack_range
    }

    /// Whether the attack cooldown has elapsed.
    pub fn cooldown_ready(&self, now_ms: u64) -> bool {
        match self.last_attack_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.cooldown_ms,
            None => true,
        }
    }

    /// Drives the combat state machine for one tick.
    pub fn tick(
        &mut self,
        me: EntityId,
        origin: Position,
        targeting: &mut TargetSelector,
        movement: &mut MovementController,
        world: &dyn WorldView,
        events: &EventBus,
        now_ms: u64,
    ) {
        let Some(target) = targeting.current_target().copied() else {
            self.exit_combat(targeting);
            return;
        };

        // Re-resolve the target through the world; a stale reference exits
        // combat rather than erroring.
        let Some(target_pos) = world.location_of(target.entity) else {
            self.exit_combat(targeting);
            return;
        };
        if !world.is_alive(target.entity) {
            self.exit_combat(targeting);
            return;
        }

        let distance = origin.distance(target_pos);
        if distance > self.attack_range {
            self.state = CombatState::Approaching;
            movement.move_to(target_pos);
            return;
        }

        self.state = CombatState::Attacking;
        movement.clear_destination();
        if self.cooldown_ready(now_ms) {
            self.try_attack(me, origin, target.entity, world, events, now_ms);
        }
    }

    /// Attempts one attack. Returns true when the attack was performed.
    ///
    /// Validity requires an elapsed cooldown, line of sight (approximated by
    /// the short `los_range` distance check), and a living target.
    pub fn try_attack(
        &mut self,
        me: EntityId,
        origin: Position,
        target: EntityId,
        world: &dyn WorldView,
        events: &EventBus,
        now_ms: u64,
    ) -> bool {
        if !self.cooldown_ready(now_ms) {
            return false;
        }
        let Some(target_pos) = world.location_of(target) else {
            return false;
        };
        let distance = origin.distance(target_pos);
        if distance > self.los_range || !world.is_alive(target) {
            return false;
        }

        let agent = agent_core::AgentId(me.0);
        let my_health = world.health_of(me).unwrap_or(0.0);
        let before_health = world.health_of(target).unwrap_or(0.0);
        let state_hash =
            events::observation_hash(agent, origin, my_health, Some(distance), Some(before_health));

        world.apply_damage(me, target, self.attack_damage);
        self.last_attack_ms = Some(now_ms);

        let after_health = world.health_of(target).unwrap_or(0.0);
        let dealt = (before_health - after_health).max(0.0);
        let kill_bonus = if world.is_alive(target) { 0.0 } else { 10.0 };
        let next_state_hash = events::observation_hash(
            agent,
            origin,
            my_health,
            Some(distance),
            Some(after_health),
        );

        tracing::debug!(agent = %me, target = %target, dealt, "attack performed");
        events.publish(Event::Experience(Experience {
            agent,
            state_hash,
            action: DecisionAction::Attack,
            reward: dealt + kill_bonus,
            next_state_hash,
        }));
        true
    }

    fn exit_combat(&mut self, targeting: &mut TargetSelector) {
        if self.state != CombatState::Idle {
            tracing::trace!("leaving combat");
        }
        self.state = CombatState::Idle;
        targeting.clear_target();
    }

    /// Drops all combat state. Part of agent reset.
    pub fn reset(&mut self) {
        self.state = CombatState::Idle;
        self.last_attack_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::world::InMemoryWorld;

    fn controller() -> CombatController {
        CombatController::new(&CombatConfig::default())
    }

    #[test]
    fn cooldown_gates_attack_attempts() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        let foe = EntityId(2);
        world.spawn(me, Position::ORIGIN, 100.0, 0);
        world.spawn(foe, Position::new(2.0, 0.0, 0.0), 100.0, 1);

        let events = EventBus::new();
        let mut combat = controller();

        // First attempt at t=0 succeeds.
        assert!(combat.try_attack(me, Position::ORIGIN, foe, &world, &events, 0));
        // Second attempt 500ms later is still cooling down.
        assert!(!combat.try_attack(me, Position::ORIGIN, foe, &world, &events, 500));
        // Third attempt at the full 1000ms succeeds.
        assert!(combat.try_attack(me, Position::ORIGIN, foe, &world, &events, 1000));

        assert_eq!(world.health_of(foe).unwrap(), 92.0);
    }

    #[test]
    fn attack_requires_line_of_sight_distance() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        let foe = EntityId(2);
        world.spawn(me, Position::ORIGIN, 100.0, 0);
        world.spawn(foe, Position::new(30.0, 0.0, 0.0), 100.0, 1);

        let events = EventBus::new();
        let mut combat = controller();
        assert!(!combat.try_attack(me, Position::ORIGIN, foe, &world, &events, 0));
    }

    #[test]
    fn dead_targets_are_invalid() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        let foe = EntityId(2);
        world.spawn(me, Position::ORIGIN, 100.0, 0);
        world.spawn(foe, Position::new(2.0, 0.0, 0.0), 0.0, 1);

        let events = EventBus::new();
        let mut combat = controller();
        assert!(!combat.try_attack(me, Position::ORIGIN, foe, &world, &events, 0));
    }

    #[test]
    fn attack_emits_an_experience_tuple() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        let foe = EntityId(2);
        world.spawn(me, Position::ORIGIN, 100.0, 0);
        world.spawn(foe, Position::new(2.0, 0.0, 0.0), 100.0, 1);

        let events = EventBus::new();
        let mut rx = events.subscribe(crate::events::Topic::Experience);
        let mut combat = controller();
        assert!(combat.try_attack(me, Position::ORIGIN, foe, &world, &events, 0));

        match rx.try_recv() {
            Ok(Event::Experience(exp)) => {
                assert_eq!(exp.action, DecisionAction::Attack);
                assert_eq!(exp.reward, CombatConfig::default().attack_damage);
                assert_ne!(exp.state_hash, exp.next_state_hash);
            }
            other => panic!("expected experience event, got {other:?}"),
        }
    }

    #[test]
    fn tick_without_target_leaves_combat() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        world.spawn(me, Position::ORIGIN, 100.0, 0);

        let events = EventBus::new();
        let mut combat = controller();
        let mut targeting = TargetSelector::new(&crate::config::TargetingConfig::default());
        let mut movement = MovementController::new(&crate::config::MovementConfig::default());

        combat.tick(
            me,
            Position::ORIGIN,
            &mut targeting,
            &mut movement,
            &world,
            &events,
            0,
        );
        assert_eq!(combat.state(), CombatState::Idle);
    }

    #[test]
    fn out_of_range_target_triggers_approach() {
        let world = InMemoryWorld::new();
        let me = EntityId(1);
        let foe = EntityId(2);
        world.spawn(me, Position::ORIGIN, 100.0, 0);
        world.spawn(foe, Position::new(10.0, 0.0, 0.0), 100.0, 1);

        let events = EventBus::new();
        let mut combat = controller();
        let mut targeting = TargetSelector::new(&crate::config::TargetingConfig::default());
        let mut movement = MovementController::new(&crate::config::MovementConfig::default());
        targeting.set_target(foe, Position::ORIGIN, &world);

        combat.tick(
            me,
            Position::ORIGIN,
            &mut targeting,
            &mut movement,
            &world,
            &events,
            0,
        );
        assert_eq!(combat.state(), CombatState::Approaching);
        assert_eq!(movement.destination(), Some(Position::new(10.0, 0.0, 0.0)));
    }
}

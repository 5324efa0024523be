//! Target selection.
//!
//! The selector re-evaluates candidates at a fixed interval, or immediately
//! when the current target stops being valid (dead, out of range, or gone
//! from the world). Candidates are every hostile entity within the maximum
//! radius, ranked by ascending distance with ascending health as the
//! tie-break: at equal distance the weaker target wins.

use agent_core::{EntityId, Position, WorldView};

use crate::config::TargetingConfig;
use crate::events::{self, DecisionAction, Event, EventBus, Experience};

/// A selected target: a weak reference to a world entity plus its cached
/// distance. Never owned; re-resolved through the world every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub entity: EntityId,
    pub distance: f64,
}

/// Per-agent target selection subsystem.
pub struct TargetSelector {
    current: Option<Target>,
    interval_ms: u64,
    max_radius: f64,
    last_eval_ms: Option<u64>,
}

impl TargetSelector {
    pub fn new(config: &TargetingConfig) -> Self {
        Self {
            current: None,
            interval_ms: config.interval_ms,
            max_radius: config.max_radius,
            last_eval_ms: None,
        }
    }

    /// The current target, if any.
    pub fn current_target(&self) -> Option<&Target> {
        self.current.as_ref()
    }

    pub fn has_target(&self) -> bool {
        self.current.is_some()
    }

    /// Forces the target, bypassing ranking. Used by group coordination to
    /// steer members onto assigned threats.
    pub fn set_target(&mut self, entity: EntityId, origin: Position, world: &dyn WorldView) {
        let distance = world
            .location_of(entity)
            .map(|pos| origin.distance(pos))
            .unwrap_or(f64::MAX);
        self.current = Some(Target { entity, distance });
    }

    pub fn clear_target(&mut self) {
        self.current = None;
    }

    /// Maximum acquisition radius in world units.
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Periodic update: refresh the cached distance, drop an invalidated
    /// target immediately, and re-rank candidates when the interval is due.
    pub fn tick(
        &mut self,
        me: EntityId,
        origin: Position,
        world: &dyn WorldView,
        events: &EventBus,
        now_ms: u64,
    ) {
        // Refresh the cached distance and validate the current target.
        if let Some(target) = self.current.as_mut() {
            match world.location_of(target.entity) {
                Some(pos) if world.is_alive(target.entity) => {
                    target.distance = origin.distance(pos);
                }
                _ => {
                    tracing::debug!(agent = %me, target = %target.entity, "target no longer resolvable");
                    self.current = None;
                }
            }
        }
        if let Some(target) = &self.current
            && target.distance > self.max_radius
        {
            tracing::debug!(agent = %me, target = %target.entity, "target left acquisition radius");
            self.current = None;
        }

        let due = match self.last_eval_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
            None => true,
        };
        // Invalidation triggers an immediate re-selection regardless of the
        // interval.
        if due || self.current.is_none() {
            self.select_now(me, origin, world, events, now_ms);
        }
    }

    /// Runs a ranking pass immediately. Returns true when a target was found.
    pub fn select_now(
        &mut self,
        me: EntityId,
        origin: Position,
        world: &dyn WorldView,
        events: &EventBus,
        now_ms: u64,
    ) -> bool {
        self.last_eval_ms = Some(now_ms);

        let mut candidates: Vec<(EntityId, f64, f64)> = world
            .nearby_entities(origin, self.max_radius)
            .into_iter()
            .filter(|&entity| entity != me)
            .filter(|&entity| world.is_hostile(me, entity) && world.is_alive(entity))
            .filter_map(|entity| {
                let pos = world.location_of(entity)?;
                let health = world.health_of(entity)?;
                Some((entity, origin.distance(pos), health))
            })
            .filter(|(_, distance, _)| *distance <= self.max_radius)
            .collect();

        // Primary key: ascending distance. Tie-break: ascending health, so
        // the weaker of two equidistant candidates is preferred.
        candidates.sort_by(|a, b| {
            a.1.total_cmp(&b.1).then_with(|| a.2.total_cmp(&b.2))
        });

        let previous = self.current.map(|t| t.entity);
        self.current = candidates
            .first()
            .map(|&(entity, distance, _)| Target { entity, distance });

        match &self.current {
            Some(target) => {
                if previous != Some(target.entity) {
                    tracing::debug!(agent = %me, target = %target.entity, distance = target.distance, "target acquired");
                    self.emit_selection(me, origin, world, events, target);
                }
                true
            }
            None => false,
        }
    }

    fn emit_selection(
        &self,
        me: EntityId,
        origin: Position,
        world: &dyn WorldView,
        events: &EventBus,
        target: &Target,
    ) {
        let agent = agent_core::AgentId(me.0);
        let health = world.health_of(me).unwrap_or(0.0);
        let target_health = world.health_of(target.entity);
        let before = events::observation_hash(agent, origin, health, None, None);
        let after = events::observation_hash(
            agent,
            origin,
            health,
            Some(target.distance),
            target_health,
        );
        events.publish(Event::Experience(Experience {
            agent,
            state_hash: before,
            action: DecisionAction::SelectTarget,
            reward: 0.0,
            next_state_hash: after,
        }));
    }

    /// Drops all selection state. Part of agent reset.
    pub fn reset(&mut self) {
        self.current = None;
        self.last_eval_ms = None;
    }
}

//! The simulated agent.
//!
//! An [`Agent`] owns one [`TickCtx`] (identity, mirrored world state, the
//! blackboard, and the four decision subsystems) plus one behavior tree
//! instantiated from a [`TreeSpec`]. The tree operates on the context: leaf
//! nodes read and write the blackboard and call into the subsystems.
//!
//! Ticking order within one simulation tick:
//! 1. mirror position/health from the world
//! 2. subsystem ticks: targeting → combat → pathfinder → movement
//! 3. tree execution
//! 4. mode reconciliation
//!
//! Unexpected internal errors are caught at this single boundary and logged
//! with the agent identity; the agent resumes from its last valid state on
//! the next tick.

pub mod combat;
pub mod modes;
pub mod movement;
pub mod pathfind;
pub mod targeting;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use behavior_tree::{Node, Status, TickClock};

use agent_core::{AgentId, Blackboard, EntityId, Position, WorldView};

use crate::behavior::TreeSpec;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::events::EventBus;
use crate::snapshot::AgentSnapshot;

pub use combat::{CombatController, CombatState};
pub use modes::{BehaviorController, Mode};
pub use movement::MovementController;
pub use pathfind::{PathFinder, PathStrategy, StraightLine};
pub use targeting::{Target, TargetSelector};

/// Everything the behavior tree and the subsystems operate on.
///
/// The context is the tree's blackboard in the wide sense: tree leaves get
/// `&mut TickCtx` and reach the subsystems, the key/value [`Blackboard`],
/// and the world through it.
pub struct TickCtx {
    pub id: AgentId,
    /// Position mirrored from the world at the start of the current tick.
    pub position: Position,
    /// Health mirrored from the world at the start of the current tick.
    pub health: f64,
    pub blackboard: Blackboard,
    pub targeting: TargetSelector,
    pub movement: MovementController,
    pub combat: CombatController,
    pub pathfinder: PathFinder,
    pub modes: BehaviorController,
    pub world: Arc<dyn WorldView>,
    pub events: EventBus,
    /// Simulation time at the start of the current tick.
    pub now_ms: u64,
}

impl TickClock for TickCtx {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

impl TickCtx {
    /// The world entity this agent is known by.
    pub fn entity(&self) -> EntityId {
        self.id.into()
    }

    pub fn has_target(&self) -> bool {
        self.targeting.has_target()
    }

    /// Resolves the current target's position through the world.
    pub fn target_position(&self) -> Option<Position> {
        let target = self.targeting.current_target()?;
        self.world.location_of(target.entity)
    }

    /// Distance to the current target, freshly resolved.
    pub fn distance_to_target(&self) -> Option<f64> {
        self.target_position().map(|pos| self.position.distance(pos))
    }
}

/// A simulated actor: one blackboard, one tree instance, four subsystems.
pub struct Agent {
    ctx: TickCtx,
    tree: Node<TickCtx>,
    spec: TreeSpec,
}

impl Agent {
    /// Creates an agent from a tree descriptor.
    ///
    /// Position and health are mirrored from the world when the agent's
    /// entity already exists there.
    pub fn new(
        id: AgentId,
        spec: TreeSpec,
        world: Arc<dyn WorldView>,
        events: EventBus,
        config: &AgentConfig,
    ) -> Result<Self> {
        let tree = spec.instantiate()?;
        let entity = EntityId::from(id);
        let position = world.location_of(entity).unwrap_or_default();
        let health = world.health_of(entity).unwrap_or(0.0);

        Ok(Self {
            ctx: TickCtx {
                id,
                position,
                health,
                blackboard: Blackboard::new(),
                targeting: TargetSelector::new(&config.targeting),
                movement: MovementController::new(&config.movement),
                combat: CombatController::new(&config.combat),
                pathfinder: PathFinder::new(&config.pathfinding),
                modes: BehaviorController::new(&config.modes, id.0),
                world,
                events,
                now_ms: 0,
            },
            tree,
            spec,
        })
    }

    pub fn id(&self) -> AgentId {
        self.ctx.id
    }

    pub fn position(&self) -> Position {
        self.ctx.position
    }

    pub fn health(&self) -> f64 {
        self.ctx.health
    }

    pub fn mode(&self) -> Mode {
        self.ctx.modes.mode()
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.ctx.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.ctx.blackboard
    }

    /// Read access to the tick context (tests and inspection).
    pub fn ctx(&self) -> &TickCtx {
        &self.ctx
    }

    // ------------------------------------------------------------------
    // Public controller surface
    //
    // This is the sole permitted cross-agent mutation path: the group
    // coordinator (and the command layer) steer agents through these
    // methods, never by touching the blackboard or tree directly.
    // ------------------------------------------------------------------

    pub fn move_towards(&mut self, destination: Position) {
        self.ctx.movement.move_to(destination);
    }

    pub fn set_urgent(&mut self, urgent: bool) {
        self.ctx.movement.set_urgent(urgent);
    }

    pub fn set_waiting_for_group(&mut self, waiting: bool) {
        self.ctx.movement.set_waiting_for_group(waiting);
    }

    pub fn set_target(&mut self, entity: EntityId) {
        let world = Arc::clone(&self.ctx.world);
        self.ctx
            .targeting
            .set_target(entity, self.ctx.position, &*world);
    }

    pub fn clear_target(&mut self) {
        self.ctx.targeting.clear_target();
    }

    pub fn has_target(&self) -> bool {
        self.ctx.targeting.has_target()
    }

    pub fn set_idle_mode(&mut self) {
        self.ctx.modes.set_idle_mode();
    }

    pub fn set_combat_mode(&mut self) {
        self.ctx.modes.set_combat_mode();
    }

    pub fn set_patrol_mode(&mut self, anchor: Position) {
        self.ctx.modes.set_patrol_mode(anchor);
    }

    pub fn set_explore_mode(&mut self, anchor: Position) {
        self.ctx.modes.set_explore_mode(anchor);
    }

    pub fn set_defend_mode(&mut self, anchor: Position) {
        self.ctx.modes.set_defend_mode(anchor);
    }

    pub fn set_escort_mode(&mut self, charge: EntityId) {
        self.ctx.modes.set_escort_mode(charge);
    }

    // ------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------

    /// Runs one simulation tick.
    ///
    /// Expected conditions (missing targets, unreachable destinations) were
    /// already folded into tree `Failure`s by the subsystems; anything that
    /// still panics is caught here, logged, and dropped so the simulation
    /// loop never dies.
    pub fn tick(&mut self, now_ms: u64) -> Status {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.tick_inner(now_ms)));
        match outcome {
            Ok(status) => status,
            Err(payload) => {
                let message = panic_message(&payload);
                tracing::error!(agent = %self.ctx.id, message, "tick panicked; resuming next cycle");
                Status::Failure
            }
        }
    }

    fn tick_inner(&mut self, now_ms: u64) -> Status {
        self.ctx.now_ms = now_ms;

        // Mirror world state. A despawned entity keeps its last known
        // mirror; the registry owner decides when to recycle the agent.
        let entity = self.ctx.entity();
        if let Some(position) = self.ctx.world.location_of(entity) {
            self.ctx.position = position;
        }
        if let Some(health) = self.ctx.world.health_of(entity) {
            self.ctx.health = health;
        }

        // Subsystem ticks. Split borrows keep each subsystem's access
        // disjoint from its collaborators.
        let TickCtx {
            id,
            position,
            targeting,
            movement,
            combat,
            pathfinder,
            world,
            events,
            ..
        } = &mut self.ctx;
        let entity = EntityId::from(*id);
        let world = &**world;

        targeting.tick(entity, *position, world, events, now_ms);
        combat.tick(entity, *position, targeting, movement, world, events, now_ms);
        pathfinder.tick(*position, movement);
        movement.tick(entity, *position, world);

        let status = self.tree.tick(&mut self.ctx);

        let TickCtx {
            position,
            targeting,
            movement,
            modes,
            world,
            ..
        } = &mut self.ctx;
        modes.tick(*position, targeting.has_target(), movement, &**world);

        tracing::trace!(agent = %self.ctx.id, ?status, "tick complete");
        status
    }

    /// Resets the agent to a blank decision state: blackboard cleared, tree
    /// and every subsystem back to initial state. Identity and mirrored
    /// world state survive.
    pub fn reset(&mut self) {
        self.ctx.blackboard.clear();
        self.tree.reset();
        self.ctx.targeting.reset();
        self.ctx.movement.reset();
        self.ctx.combat.reset();
        self.ctx.pathfinder.reset();
        self.ctx.modes.reset();
    }

    // ------------------------------------------------------------------
    // Persistence boundary
    // ------------------------------------------------------------------

    /// Serializable snapshot of this agent.
    pub fn describe(&self) -> AgentSnapshot {
        let mut running = Vec::new();
        self.tree.collect_running(&mut running);
        AgentSnapshot {
            id: self.ctx.id,
            position: self.ctx.position,
            health: self.ctx.health,
            mode: self.ctx.modes.mode(),
            anchor: self.ctx.modes.anchor(),
            tree: self.spec.clone(),
            running,
            blackboard: self.ctx.blackboard.clone(),
        }
    }

    /// Reconstructs an agent from a snapshot.
    pub fn restore(
        snapshot: AgentSnapshot,
        world: Arc<dyn WorldView>,
        events: EventBus,
        config: &AgentConfig,
    ) -> Result<Self> {
        let mut agent = Self::new(snapshot.id, snapshot.tree, world, events, config)?;
        agent.ctx.position = snapshot.position;
        agent.ctx.health = snapshot.health;
        agent.ctx.blackboard = snapshot.blackboard;
        agent
            .ctx
            .modes
            .restore_mode(snapshot.mode, snapshot.anchor);
        agent
            .tree
            .apply_running(&mut snapshot.running.iter().copied());
        Ok(agent)
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

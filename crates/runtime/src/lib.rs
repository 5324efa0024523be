//! Runtime orchestration for the autonomous agent simulation.
//!
//! This crate wires the behavior tree engine and the per-agent decision
//! subsystems into a tick-driven simulation. Consumers construct a
//! [`SimContext`] (world handle, registries, event bus, configuration), spawn
//! agents from [`behavior::TreeSpec`] descriptors, and drive everything
//! through [`Simulation::step`].
//!
//! Modules are organized by responsibility:
//! - [`agent`] hosts the agent, its tick context, and the four decision
//!   subsystems (targeting, movement, combat, pathfinding) plus the mode
//!   state machine
//! - [`behavior`] provides the named tree leaves, ready-made presets, and the
//!   serializable tree descriptor
//! - [`group`] provides multi-agent formation, threat assignment, and
//!   cohesion coordination
//! - [`events`] provides the topic-based event bus that publishes decision
//!   outcomes as experience tuples for external trainers
//! - [`snapshot`] provides agent persistence at the repository boundary

pub mod agent;
pub mod behavior;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod group;
pub mod registry;
pub mod simulation;
pub mod snapshot;
pub mod world;

pub use agent::{
    Agent, BehaviorController, CombatController, CombatState, Mode, MovementController,
    PathFinder, PathStrategy, StraightLine, Target, TargetSelector, TickCtx,
};
pub use behavior::TreeSpec;
pub use clock::SimClock;
pub use config::{AgentConfig, CoordinatorConfig, SimConfig};
pub use context::SimContext;
pub use error::{Result, RuntimeError};
pub use events::{DecisionAction, Event, EventBus, Experience, LifecycleEvent, Topic};
pub use group::{Group, GroupCoordinator, GroupObjective, GroupRegistry, GroupRole};
pub use registry::AgentRegistry;
pub use simulation::Simulation;
pub use snapshot::{
    AgentSnapshot, FileSnapshotRepository, InMemorySnapshotRepo, SnapshotRepository,
};
pub use world::InMemoryWorld;

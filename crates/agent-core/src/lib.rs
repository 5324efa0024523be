//! Foundational types shared by the agent simulation crates.
//!
//! This crate is deliberately small and dependency-light. It holds the
//! vocabulary every other crate speaks:
//!
//! - [`AgentId`] / [`EntityId`] / [`GroupId`]: newtype identifiers; all
//!   cross-references in the simulation are ids resolved through registries,
//!   never owning pointers
//! - [`Position`]: continuous world coordinates with the small amount of
//!   vector math the movement model needs
//! - [`Blackboard`]: per-agent key/value scratch space for passing data
//!   between behavior tree nodes across ticks
//! - [`WorldView`]: the narrow boundary through which the core observes and
//!   affects the world; the core never mutates world state directly

pub mod blackboard;
pub mod ids;
pub mod position;
pub mod world;

pub use blackboard::{Blackboard, Value};
pub use ids::{AgentId, EntityId, GroupId};
pub use position::Position;
pub use world::WorldView;

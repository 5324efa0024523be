//! Deterministic behavior tree engine for tick-driven agent simulations.
//!
//! This library provides a minimal, deterministic behavior tree implementation
//! designed for real-time agent simulations that advance in discrete ticks.
//!
//! - **Three-valued results**: [`Status::Running`] models multi-tick work that
//!   is re-entered on the next tick, without blocking or coroutines
//! - **Resumable composites**: [`Sequence`] and [`Selector`] keep a cursor so
//!   a `Running` child is re-entered at the same index next tick
//! - **Closed node set**: the whole engine is a single tagged [`Node`] enum
//!   rather than an open trait hierarchy, so dispatch is a `match` and trees
//!   are plain owned data (trees, not graphs, no back-references)
//! - **Clock injection**: time-based nodes read milliseconds from the context
//!   via [`TickClock`], keeping every tick deterministic and testable
//!
//! # Architecture
//!
//! - [`Node`]: the tagged node variant with `tick`/`reset` dispatch
//! - [`Status`]: Success, Failure, or Running
//! - Composite nodes: [`Sequence`], [`Selector`], [`Parallel`]
//! - Decorator nodes: [`Invert`], [`Repeat`], [`Succeed`], [`Timeout`]
//! - Leaf nodes: [`Action`], [`Condition`] (named boxed closures)

pub mod builder;
pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod node;
pub mod status;
pub mod time;

// Re-export core types for ergonomic API
pub use composite::{Parallel, Policy, Selector, Sequence};
pub use decorator::{Invert, Repeat, Succeed, Timeout};
pub use leaf::{Action, ActionFn, Condition, ConditionFn};
pub use node::Node;
pub use status::Status;
pub use time::TickClock;

//! Condition leaves.
//!
//! Each constructor returns a named [`Node`] that reads the tick context
//! without mutating decision state.

use behavior_tree::{builder::condition, Node};

use crate::agent::TickCtx;

/// Health fraction (of nominal full health) below which an agent counts as
/// wounded.
const LOW_HEALTH_THRESHOLD: f64 = 30.0;

/// Succeeds while a target is selected.
pub fn has_target() -> Node<TickCtx> {
    condition("has-target", |ctx: &mut TickCtx| ctx.has_target())
}

/// Succeeds while the current target is within attack range.
pub fn target_in_range() -> Node<TickCtx> {
    condition("target-in-range", |ctx: &mut TickCtx| {
        ctx.distance_to_target()
            .is_some_and(|distance| distance <= ctx.combat.attack_range())
    })
}

/// Succeeds while the agent's health is below the wounded threshold.
pub fn health_low() -> Node<TickCtx> {
    condition("health-low", |ctx: &mut TickCtx| {
        ctx.health < LOW_HEALTH_THRESHOLD
    })
}

/// Succeeds while a movement destination is set.
pub fn is_moving() -> Node<TickCtx> {
    condition("is-moving", |ctx: &mut TickCtx| ctx.movement.is_moving())
}

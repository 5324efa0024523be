//! Action leaves.
//!
//! Each constructor returns a named [`Node`] whose closure drives one of the
//! decision subsystems. Multi-tick work (chasing, fleeing, returning to the
//! post) reports `Running` so the tree re-enters the same leaf next tick.

use behavior_tree::{builder::action, Node, Status};

use crate::agent::TickCtx;

/// Runs a ranking pass. Succeeds when a target was acquired.
pub fn select_target() -> Node<TickCtx> {
    action("select-target", |ctx: &mut TickCtx| {
        let me = ctx.entity();
        let origin = ctx.position;
        let now = ctx.now_ms;
        let found = ctx
            .targeting
            .select_now(me, origin, &*ctx.world, &ctx.events, now);
        if found { Status::Success } else { Status::Failure }
    })
}

/// Attacks the current target.
///
/// Fails with no target in attack range. In range, succeeds on a performed
/// attack and reports `Running` while the cooldown holds the swing back.
pub fn attack_target() -> Node<TickCtx> {
    action("attack-target", |ctx: &mut TickCtx| {
        let Some(target) = ctx.targeting.current_target().copied() else {
            return Status::Failure;
        };
        let Some(distance) = ctx.distance_to_target() else {
            return Status::Failure;
        };
        if distance > ctx.combat.attack_range() {
            return Status::Failure;
        }

        let me = ctx.entity();
        let origin = ctx.position;
        let now = ctx.now_ms;
        let attacked = ctx
            .combat
            .try_attack(me, origin, target.entity, &*ctx.world, &ctx.events, now);
        if attacked { Status::Success } else { Status::Running }
    })
}

/// Closes distance to the current target.
///
/// Succeeds once within attack range, runs while approaching, fails with no
/// resolvable target.
pub fn chase_target() -> Node<TickCtx> {
    action("chase-target", |ctx: &mut TickCtx| {
        let Some(target_pos) = ctx.target_position() else {
            return Status::Failure;
        };
        if ctx.position.distance(target_pos) <= ctx.combat.attack_range() {
            return Status::Success;
        }
        ctx.movement.move_to(target_pos);
        Status::Running
    })
}

/// Drops the current target. Always succeeds.
pub fn clear_target() -> Node<TickCtx> {
    action("clear-target", |ctx: &mut TickCtx| {
        ctx.targeting.clear_target();
        Status::Success
    })
}

/// Computes a path to the current target through the pathfinder.
///
/// Succeeds when a path is loaded (freshly computed or still being walked),
/// fails with no target or when the strategy found no path.
pub fn find_path_to_target() -> Node<TickCtx> {
    action("find-path-to-target", |ctx: &mut TickCtx| {
        let Some(target_pos) = ctx.target_position() else {
            return Status::Failure;
        };
        let origin = ctx.position;
        let now = ctx.now_ms;
        if ctx.pathfinder.find_path(origin, target_pos, now) || ctx.pathfinder.has_path() {
            Status::Success
        } else {
            Status::Failure
        }
    })
}

/// Switches to patrol mode anchored at the current position. The mode state
/// machine issues the waypoints.
pub fn patrol_step() -> Node<TickCtx> {
    action("patrol-step", |ctx: &mut TickCtx| {
        use crate::agent::Mode;
        if ctx.modes.mode() != Mode::Patrol {
            let anchor = ctx.position;
            ctx.modes.set_patrol_mode(anchor);
        }
        Status::Success
    })
}

/// Switches to explore mode anchored at the current position.
pub fn explore_step() -> Node<TickCtx> {
    action("explore-step", |ctx: &mut TickCtx| {
        use crate::agent::Mode;
        if ctx.modes.mode() != Mode::Explore {
            let anchor = ctx.position;
            ctx.modes.set_explore_mode(anchor);
        }
        Status::Success
    })
}

/// Walks back to the mode anchor. Succeeds on arrival, runs while walking.
pub fn return_to_post() -> Node<TickCtx> {
    action("return-to-post", |ctx: &mut TickCtx| {
        let anchor = ctx.modes.anchor();
        if ctx.position.distance(anchor) <= ctx.movement.arrival_threshold() {
            return Status::Success;
        }
        ctx.movement.move_to(anchor);
        Status::Running
    })
}

/// Moves directly away from the current target.
///
/// Succeeds when there is nothing to flee from, runs while retreating.
pub fn flee() -> Node<TickCtx> {
    action("flee", |ctx: &mut TickCtx| {
        let Some(threat_pos) = ctx.target_position() else {
            return Status::Success;
        };
        let distance = ctx.modes.flee_distance();
        // Standing exactly on the threat: pick an arbitrary axis.
        let (dx, dy, dz) = threat_pos
            .direction_to(ctx.position)
            .unwrap_or((1.0, 0.0, 0.0));
        let away = ctx
            .position
            .offset(dx * distance, dy * distance, dz * distance);
        ctx.movement.move_to(away);
        ctx.movement.set_urgent(true);
        Status::Running
    })
}

/// Stops moving and returns to idle mode. Always succeeds.
pub fn idle() -> Node<TickCtx> {
    action("idle", |ctx: &mut TickCtx| {
        ctx.movement.clear_destination();
        ctx.modes.set_idle_mode();
        Status::Success
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agent_core::{EntityId, Position, WorldView};

    use super::*;
    use crate::behavior::testutil::test_ctx;
    use crate::world::InMemoryWorld;

    fn arena() -> (Arc<InMemoryWorld>, TickCtx) {
        let world = Arc::new(InMemoryWorld::new());
        world.spawn(EntityId(1), Position::ORIGIN, 100.0, 0);
        world.spawn(EntityId(2), Position::new(2.0, 0.0, 0.0), 50.0, 1);
        let ctx = test_ctx(world.clone(), 1);
        (world, ctx)
    }

    #[test]
    fn select_target_acquires_the_nearest_hostile() {
        let (_, mut ctx) = arena();
        let mut node = select_target();
        assert_eq!(node.tick(&mut ctx), Status::Success);
        assert_eq!(
            ctx.targeting.current_target().map(|t| t.entity),
            Some(EntityId(2))
        );
    }

    #[test]
    fn attack_in_range_succeeds_then_cools_down() {
        let (world, mut ctx) = arena();
        ctx.targeting.set_target(EntityId(2), ctx.position, &*world);

        let mut node = attack_target();
        assert_eq!(node.tick(&mut ctx), Status::Success);
        assert_eq!(world.health_of(EntityId(2)).unwrap(), 46.0);

        // Cooldown holds the next swing back.
        ctx.now_ms = 500;
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(world.health_of(EntityId(2)).unwrap(), 46.0);
    }

    #[test]
    fn chase_runs_until_in_range() {
        let (world, mut ctx) = arena();
        world.apply_move(EntityId(2), Position::new(10.0, 0.0, 0.0));
        ctx.targeting.set_target(EntityId(2), ctx.position, &*world);

        let mut node = chase_target();
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(
            ctx.movement.destination(),
            Some(Position::new(10.0, 0.0, 0.0))
        );

        ctx.position = Position::new(8.0, 0.0, 0.0);
        assert_eq!(node.tick(&mut ctx), Status::Success);
    }

    #[test]
    fn flee_retreats_away_from_the_threat() {
        let (world, mut ctx) = arena();
        ctx.targeting.set_target(EntityId(2), ctx.position, &*world);

        let mut node = flee();
        assert_eq!(node.tick(&mut ctx), Status::Running);
        let dest = ctx.movement.destination().unwrap();
        // Threat sits at +x, so the retreat goes to -x.
        assert!(dest.x < 0.0);
        assert!(ctx.movement.is_urgent());
    }

    #[test]
    fn flee_with_no_target_is_done() {
        let (_, mut ctx) = arena();
        let mut node = flee();
        assert_eq!(node.tick(&mut ctx), Status::Success);
    }

    #[test]
    fn return_to_post_walks_home() {
        let (_, mut ctx) = arena();
        ctx.modes.set_defend_mode(Position::ORIGIN);
        ctx.position = Position::new(10.0, 0.0, 0.0);

        let mut node = return_to_post();
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(ctx.movement.destination(), Some(Position::ORIGIN));

        ctx.position = Position::new(0.1, 0.0, 0.0);
        assert_eq!(node.tick(&mut ctx), Status::Success);
    }
}

//! Leaf behavior nodes.
//!
//! Leaves are where the tree touches the outside world. Instead of an open
//! trait per node type, a leaf is a named boxed closure over the context:
//! [`Action`] performs work (and may report [`Status::Running`] across
//! ticks), [`Condition`] tests the context and maps the boolean onto
//! Success/Failure.
//!
//! Private leaf execution state (timers, counters) lives inside the closure
//! captures; the name is stable and is what tree descriptors persist.

use crate::status::Status;

/// Boxed work closure for [`Action`] leaves.
pub type ActionFn<C> = Box<dyn FnMut(&mut C) -> Status + Send>;

/// Boxed predicate closure for [`Condition`] leaves.
pub type ConditionFn<C> = Box<dyn FnMut(&mut C) -> bool + Send>;

/// Leaf node that performs work against the context.
pub struct Action<C> {
    name: &'static str,
    run: ActionFn<C>,
    pub(crate) running: bool,
}

impl<C> Action<C> {
    /// Creates a named action leaf.
    pub fn new(name: &'static str, run: impl FnMut(&mut C) -> Status + Send + 'static) -> Self {
        Self {
            name,
            run: Box::new(run),
            running: false,
        }
    }

    /// The stable leaf name used by tree descriptors and trace output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        let status = (self.run)(ctx);
        tracing::trace!(leaf = self.name, ?status, "action ticked");
        status
    }

    pub(crate) fn reset(&mut self) {
        self.running = false;
    }
}

/// Leaf node that tests the context.
///
/// Conditions complete within a single tick: the predicate's `true` maps to
/// `Success` and `false` to `Failure`. Multi-tick work belongs in [`Action`].
pub struct Condition<C> {
    name: &'static str,
    test: ConditionFn<C>,
    pub(crate) running: bool,
}

impl<C> Condition<C> {
    /// Creates a named condition leaf.
    pub fn new(name: &'static str, test: impl FnMut(&mut C) -> bool + Send + 'static) -> Self {
        Self {
            name,
            test: Box::new(test),
            running: false,
        }
    }

    /// The stable leaf name used by tree descriptors and trace output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        let met = (self.test)(ctx);
        tracing::trace!(leaf = self.name, met, "condition ticked");
        if met { Status::Success } else { Status::Failure }
    }

    pub(crate) fn reset(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::*;
    use crate::{Status, TickClock};

    struct Ctx {
        hp: i32,
        now: u64,
    }

    impl TickClock for Ctx {
        fn now_ms(&self) -> u64 {
            self.now
        }
    }

    #[test]
    fn condition_maps_predicate_onto_status() {
        let mut low_hp = condition("low-hp", |ctx: &mut Ctx| ctx.hp < 30);

        let mut ctx = Ctx { hp: 10, now: 0 };
        assert_eq!(low_hp.tick(&mut ctx), Status::Success);

        ctx.hp = 80;
        assert_eq!(low_hp.tick(&mut ctx), Status::Failure);
    }

    #[test]
    fn action_keeps_private_state_across_ticks() {
        let mut remaining = 3;
        let mut drain = action("drain", move |ctx: &mut Ctx| {
            ctx.hp -= 1;
            remaining -= 1;
            if remaining == 0 { Status::Success } else { Status::Running }
        });

        let mut ctx = Ctx { hp: 10, now: 0 };
        assert_eq!(drain.tick(&mut ctx), Status::Running);
        assert_eq!(drain.tick(&mut ctx), Status::Running);
        assert_eq!(drain.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.hp, 7);
    }
}

//! The closed node variant and its `tick`/`reset` dispatch.
//!
//! Every behavior tree is an owned value of [`Node`]. There is no trait
//! hierarchy and no dynamic dispatch between node kinds: composites own their
//! children as `Vec<Node<C>>`, decorators as `Box<Node<C>>`, and the only
//! boxed closures live in the leaves. This keeps trees plain data that can be
//! walked, reset, and inspected without virtual calls.

use crate::composite::{Parallel, Selector, Sequence};
use crate::decorator::{Invert, Repeat, Succeed, Timeout};
use crate::leaf::{Action, Condition};
use crate::status::Status;
use crate::time::TickClock;

/// A behavior tree node.
///
/// # State
///
/// Each node carries a `running` flag mirroring whether its last tick
/// returned [`Status::Running`]. Beyond that flag, cross-tick state is
/// strictly limited to:
/// - a child cursor (Sequence, Selector)
/// - an attempt counter (Repeat)
/// - a start timestamp (Timeout)
///
/// [`Node::reset`] clears all of it, recursively and idempotently.
pub enum Node<C> {
    /// Runs children in order; fails on the first failing child.
    Sequence(Sequence<C>),
    /// Runs children in order; succeeds on the first succeeding child.
    Selector(Selector<C>),
    /// Runs all children every tick and aggregates by policy.
    Parallel(Parallel<C>),
    /// Swaps the child's Success and Failure.
    Invert(Invert<C>),
    /// Retries the child until success or an attempt limit.
    Repeat(Repeat<C>),
    /// Always reports Success, discarding the child's result.
    Succeed(Succeed<C>),
    /// Fails the child once a time budget is exhausted.
    Timeout(Timeout<C>),
    /// Leaf that performs work against the context.
    Action(Action<C>),
    /// Leaf that tests the context without multi-tick work.
    Condition(Condition<C>),
}

impl<C: TickClock> Node<C> {
    /// Evaluates this node against the context and records the running flag.
    pub fn tick(&mut self, ctx: &mut C) -> Status {
        let status = match self {
            Node::Sequence(n) => n.tick(ctx),
            Node::Selector(n) => n.tick(ctx),
            Node::Parallel(n) => n.tick(ctx),
            Node::Invert(n) => n.tick(ctx),
            Node::Repeat(n) => n.tick(ctx),
            Node::Succeed(n) => n.tick(ctx),
            Node::Timeout(n) => n.tick(ctx),
            Node::Action(n) => n.tick(ctx),
            Node::Condition(n) => n.tick(ctx),
        };
        *self.running_mut() = status.is_running();
        status
    }
}

impl<C> Node<C> {
    /// Clears cursor/counter/timer state, recursively and idempotently.
    pub fn reset(&mut self) {
        match self {
            Node::Sequence(n) => n.reset(),
            Node::Selector(n) => n.reset(),
            Node::Parallel(n) => n.reset(),
            Node::Invert(n) => n.reset(),
            Node::Repeat(n) => n.reset(),
            Node::Succeed(n) => n.reset(),
            Node::Timeout(n) => n.reset(),
            Node::Action(n) => n.reset(),
            Node::Condition(n) => n.reset(),
        }
    }

    /// Whether this node's last tick returned [`Status::Running`].
    pub fn is_running(&self) -> bool {
        *self.running_ref()
    }

    /// Short node-kind label, used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Sequence(_) => "sequence",
            Node::Selector(_) => "selector",
            Node::Parallel(_) => "parallel",
            Node::Invert(_) => "invert",
            Node::Repeat(_) => "repeat",
            Node::Succeed(_) => "succeed",
            Node::Timeout(_) => "timeout",
            Node::Action(_) => "action",
            Node::Condition(_) => "condition",
        }
    }

    /// Appends the running flags of this subtree in pre-order.
    ///
    /// Together with [`Node::apply_running`] this lets callers persist and
    /// restore which nodes were mid-execution, without serializing the tree
    /// itself (leaves are closures and carry no serializable form).
    pub fn collect_running(&self, out: &mut Vec<bool>) {
        out.push(self.is_running());
        match self {
            Node::Sequence(n) => n.children().iter().for_each(|c| c.collect_running(out)),
            Node::Selector(n) => n.children().iter().for_each(|c| c.collect_running(out)),
            Node::Parallel(n) => n.children().iter().for_each(|c| c.collect_running(out)),
            Node::Invert(n) => n.child().collect_running(out),
            Node::Repeat(n) => n.child().collect_running(out),
            Node::Succeed(n) => n.child().collect_running(out),
            Node::Timeout(n) => n.child().collect_running(out),
            Node::Action(_) | Node::Condition(_) => {}
        }
    }

    /// Restores running flags collected by [`Node::collect_running`].
    ///
    /// Flags are consumed in the same pre-order. Missing flags leave the
    /// remaining nodes untouched; surplus flags are ignored by the caller.
    pub fn apply_running(&mut self, flags: &mut impl Iterator<Item = bool>) {
        let Some(flag) = flags.next() else {
            return;
        };
        *self.running_mut() = flag;
        match self {
            Node::Sequence(n) => n.children_mut().iter_mut().for_each(|c| c.apply_running(flags)),
            Node::Selector(n) => n.children_mut().iter_mut().for_each(|c| c.apply_running(flags)),
            Node::Parallel(n) => n.children_mut().iter_mut().for_each(|c| c.apply_running(flags)),
            Node::Invert(n) => n.child_mut().apply_running(flags),
            Node::Repeat(n) => n.child_mut().apply_running(flags),
            Node::Succeed(n) => n.child_mut().apply_running(flags),
            Node::Timeout(n) => n.child_mut().apply_running(flags),
            Node::Action(_) | Node::Condition(_) => {}
        }
    }

    fn running_ref(&self) -> &bool {
        match self {
            Node::Sequence(n) => &n.running,
            Node::Selector(n) => &n.running,
            Node::Parallel(n) => &n.running,
            Node::Invert(n) => &n.running,
            Node::Repeat(n) => &n.running,
            Node::Succeed(n) => &n.running,
            Node::Timeout(n) => &n.running,
            Node::Action(n) => &n.running,
            Node::Condition(n) => &n.running,
        }
    }

    fn running_mut(&mut self) -> &mut bool {
        match self {
            Node::Sequence(n) => &mut n.running,
            Node::Selector(n) => &mut n.running,
            Node::Parallel(n) => &mut n.running,
            Node::Invert(n) => &mut n.running,
            Node::Repeat(n) => &mut n.running,
            Node::Succeed(n) => &mut n.running,
            Node::Timeout(n) => &mut n.running,
            Node::Action(n) => &mut n.running,
            Node::Condition(n) => &mut n.running,
        }
    }
}

//! Decorator behavior nodes.
//!
//! Decorators wrap exactly one child behavior and modify its result or
//! execution policy: [`Invert`] (NOT logic), [`Repeat`] (bounded retry),
//! [`Succeed`] (error suppression), and [`Timeout`] (deadline abort).
//!
//! The child is owned as `Box<Node<C>>`, so a decorator without a child is
//! unrepresentable by construction.

use crate::node::Node;
use crate::status::Status;
use crate::time::TickClock;

/// Inverts the result of its child behavior.
///
/// # Semantics
///
/// - Child `Success` becomes `Failure` and vice versa
/// - `Running` passes through unchanged
pub struct Invert<C> {
    child: Box<Node<C>>,
    pub(crate) running: bool,
}

impl<C> Invert<C> {
    /// Creates a new inverter that wraps the given child behavior.
    pub fn new(child: Node<C>) -> Self {
        Self {
            child: Box::new(child),
            running: false,
        }
    }

    pub(crate) fn child(&self) -> &Node<C> {
        &self.child
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node<C> {
        &mut self.child
    }

    pub(crate) fn reset(&mut self) {
        self.running = false;
        self.child.reset();
    }
}

impl<C: TickClock> Invert<C> {
    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        self.child.tick(ctx).invert()
    }
}

/// Retries the child until it succeeds or a failure limit is reached.
///
/// # Semantics
///
/// - Child `Success` resets the attempt counter and returns `Success`
/// - Child `Failure` increments the counter; once `limit` consecutive
///   failures accumulate, the counter resets and `Failure` is returned,
///   otherwise the repeat reports `Running` and retries next tick
/// - Child `Running` passes through
pub struct Repeat<C> {
    child: Box<Node<C>>,
    limit: u32,
    attempts: u32,
    pub(crate) running: bool,
}

impl<C> Repeat<C> {
    /// Creates a new repeat decorator allowing up to `limit` failed attempts.
    pub fn new(limit: u32, child: Node<C>) -> Self {
        Self {
            child: Box::new(child),
            limit,
            attempts: 0,
            running: false,
        }
    }

    pub(crate) fn child(&self) -> &Node<C> {
        &self.child
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node<C> {
        &mut self.child
    }

    pub(crate) fn reset(&mut self) {
        self.attempts = 0;
        self.running = false;
        self.child.reset();
    }
}

impl<C: TickClock> Repeat<C> {
    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        match self.child.tick(ctx) {
            Status::Success => {
                self.attempts = 0;
                Status::Success
            }
            Status::Failure => {
                self.attempts += 1;
                if self.attempts >= self.limit {
                    // Counter resets so the next activation starts fresh.
                    self.attempts = 0;
                    Status::Failure
                } else {
                    Status::Running
                }
            }
            Status::Running => Status::Running,
        }
    }
}

/// Always returns `Success`, discarding the child's actual result.
///
/// Useful for optional behaviors and guaranteed cleanup steps that must not
/// cause an enclosing sequence to fail.
pub struct Succeed<C> {
    child: Box<Node<C>>,
    pub(crate) running: bool,
}

impl<C> Succeed<C> {
    /// Creates a new always-succeed wrapper around the given child behavior.
    pub fn new(child: Node<C>) -> Self {
        Self {
            child: Box::new(child),
            running: false,
        }
    }

    pub(crate) fn child(&self) -> &Node<C> {
        &self.child
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node<C> {
        &mut self.child
    }

    pub(crate) fn reset(&mut self) {
        self.running = false;
        self.child.reset();
    }
}

impl<C: TickClock> Succeed<C> {
    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        // Execute child but ignore the result.
        let _ = self.child.tick(ctx);
        Status::Success
    }
}

/// Fails the child once a time budget is exhausted.
///
/// # Semantics
///
/// The first invocation records a start timestamp from the context clock.
/// While the child keeps returning `Running` within the budget, `Running`
/// passes through. Once elapsed time reaches the budget, the child is reset
/// and `Failure` is returned. A terminal child result clears the timer so
/// the next activation starts a fresh window.
pub struct Timeout<C> {
    child: Box<Node<C>>,
    budget_ms: u64,
    started_at: Option<u64>,
    pub(crate) running: bool,
}

impl<C> Timeout<C> {
    /// Creates a new timeout decorator with the given budget in milliseconds.
    pub fn new(budget_ms: u64, child: Node<C>) -> Self {
        Self {
            child: Box::new(child),
            budget_ms,
            started_at: None,
            running: false,
        }
    }

    pub(crate) fn child(&self) -> &Node<C> {
        &self.child
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node<C> {
        &mut self.child
    }

    pub(crate) fn reset(&mut self) {
        self.started_at = None;
        self.running = false;
        self.child.reset();
    }
}

impl<C: TickClock> Timeout<C> {
    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        let now = ctx.now_ms();
        let started = *self.started_at.get_or_insert(now);

        if now.saturating_sub(started) >= self.budget_ms {
            tracing::trace!(budget_ms = self.budget_ms, "timeout budget exhausted");
            self.started_at = None;
            self.child.reset();
            return Status::Failure;
        }

        match self.child.tick(ctx) {
            Status::Running => Status::Running,
            terminal => {
                self.started_at = None;
                terminal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::*;
    use crate::TickClock;

    struct TestContext {
        value: i32,
        now: u64,
    }

    impl TestContext {
        fn new() -> Self {
            Self { value: 0, now: 0 }
        }
    }

    impl TickClock for TestContext {
        fn now_ms(&self) -> u64 {
            self.now
        }
    }

    fn is_positive() -> Node<TestContext> {
        condition("is-positive", |ctx: &mut TestContext| ctx.value > 0)
    }

    fn fail_and_increment() -> Node<TestContext> {
        action("fail-and-increment", |ctx: &mut TestContext| {
            ctx.value += 1;
            Status::Failure
        })
    }

    #[test]
    fn invert_swaps_terminal_results() {
        let mut inverter = invert(is_positive());

        let mut ctx = TestContext::new();
        ctx.value = 10;
        assert_eq!(inverter.tick(&mut ctx), Status::Failure);

        ctx.value = -10;
        assert_eq!(inverter.tick(&mut ctx), Status::Success);
    }

    #[test]
    fn double_invert_is_identity() {
        let mut plain = is_positive();
        let mut twice = invert(invert(is_positive()));

        let mut ctx = TestContext::new();
        for value in [-3, 0, 7] {
            ctx.value = value;
            assert_eq!(plain.tick(&mut ctx), twice.tick(&mut ctx));
        }
    }

    #[test]
    fn invert_passes_running_through() {
        let mut inverter = invert(action("busy", |_: &mut TestContext| Status::Running));

        let mut ctx = TestContext::new();
        assert_eq!(inverter.tick(&mut ctx), Status::Running);
    }

    #[test]
    fn repeat_fails_after_limit_consecutive_failures() {
        let mut node = repeat(3, fail_and_increment());

        let mut ctx = TestContext::new();
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(node.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.value, 3);

        // Counter was reset: the next activation gets a fresh budget.
        assert_eq!(node.tick(&mut ctx), Status::Running);
    }

    #[test]
    fn repeat_success_resets_the_counter() {
        let mut calls = 0;
        let flaky = action("flaky", move |_: &mut TestContext| {
            calls += 1;
            if calls <= 2 { Status::Failure } else { Status::Success }
        });
        let mut node = repeat(3, flaky);

        let mut ctx = TestContext::new();
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(node.tick(&mut ctx), Status::Running);
        assert_eq!(node.tick(&mut ctx), Status::Success);
    }

    fn succeed_stub() -> Node<TestContext> {
        action("stub", |_: &mut TestContext| Status::Success)
    }

    #[test]
    fn succeed_masks_failure() {
        let mut node = succeed(fail_and_increment());

        let mut ctx = TestContext::new();
        assert_eq!(node.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 1); // Child still executed
    }

    #[test]
    fn timeout_fails_once_budget_is_exhausted() {
        let mut node = timeout(1000, action("busy", |_: &mut TestContext| Status::Running));

        let mut ctx = TestContext::new();
        assert_eq!(node.tick(&mut ctx), Status::Running);

        ctx.now = 500;
        assert_eq!(node.tick(&mut ctx), Status::Running);

        ctx.now = 1000;
        assert_eq!(node.tick(&mut ctx), Status::Failure);
    }

    #[test]
    fn timeout_clears_timer_on_terminal_result() {
        let mut node = timeout(1000, {
            let mut calls = 0;
            action("two-tick-work", move |_: &mut TestContext| {
                calls += 1;
                if calls % 2 == 0 {
                    Status::Success
                } else {
                    Status::Running
                }
            })
        });

        let mut ctx = TestContext::new();
        assert_eq!(node.tick(&mut ctx), Status::Running);
        ctx.now = 500;
        assert_eq!(node.tick(&mut ctx), Status::Success);

        // Fresh window: even far in the future the node starts over instead
        // of failing on a stale timestamp.
        ctx.now = 10_000;
        assert_eq!(node.tick(&mut ctx), Status::Running);
        ctx.now = 10_500;
        assert_eq!(node.tick(&mut ctx), Status::Success);
    }

    #[test]
    fn timeout_resets_child_state_on_abort() {
        let mut node = timeout(
            1000,
            sequence(vec![
                succeed_stub(),
                action("busy", |_: &mut TestContext| Status::Running),
            ]),
        );

        let mut ctx = TestContext::new();
        assert_eq!(node.tick(&mut ctx), Status::Running);

        ctx.now = 1000;
        assert_eq!(node.tick(&mut ctx), Status::Failure);

        // The aborted child was reset recursively.
        let mut flags = Vec::new();
        match &node {
            Node::Timeout(t) => t.child().collect_running(&mut flags),
            _ => unreachable!(),
        }
        assert!(flags.iter().all(|f| !f));
    }
}

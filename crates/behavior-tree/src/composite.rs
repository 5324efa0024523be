//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors.
//! [`Sequence`] (AND logic) and [`Selector`] (OR logic) are resumable: a
//! `Running` child parks the cursor so the same child is re-entered next
//! tick. [`Parallel`] ticks every child every tick and aggregates the results
//! through a pair of [`Policy`] thresholds.

use crate::node::Node;
use crate::status::Status;
use crate::time::TickClock;

/// Threshold policy for [`Parallel`] aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Policy {
    /// At least one child result of the polled kind.
    RequireOne,
    /// Every child result of the polled kind.
    RequireAll,
    /// A strict majority of children.
    RequireMajority,
}

impl Policy {
    /// Whether `count` results out of `total` children satisfy this policy.
    #[inline]
    pub fn met(self, count: usize, total: usize) -> bool {
        match self {
            Policy::RequireOne => count >= 1,
            Policy::RequireAll => count >= total,
            Policy::RequireMajority => count * 2 > total,
        }
    }
}

/// Executes child behaviors in order until one fails.
///
/// # Semantics
///
/// A `Sequence` evaluates its children left to right, resuming at a cursor:
/// - On child `Success` the cursor advances; when it exhausts the children
///   the cursor resets and the sequence returns `Success`
/// - On child `Failure` the cursor resets and the sequence returns `Failure`
///   immediately (no further children run)
/// - On child `Running` the sequence returns `Running` without advancing,
///   so the same child is re-entered next tick
///
/// A sequence with no children succeeds trivially.
pub struct Sequence<C> {
    children: Vec<Node<C>>,
    cursor: usize,
    pub(crate) running: bool,
}

impl<C> Sequence<C> {
    /// Creates a new sequence with the given child behaviors.
    pub fn new(children: Vec<Node<C>>) -> Self {
        Self {
            children,
            cursor: 0,
            running: false,
        }
    }

    pub(crate) fn children(&self) -> &[Node<C>] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node<C>] {
        &mut self.children
    }

    pub(crate) fn reset(&mut self) {
        self.cursor = 0;
        self.running = false;
        self.children.iter_mut().for_each(Node::reset);
    }
}

impl<C: TickClock> Sequence<C> {
    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        while self.cursor < self.children.len() {
            match self.children[self.cursor].tick(ctx) {
                Status::Success => self.cursor += 1,
                Status::Failure => {
                    self.cursor = 0;
                    return Status::Failure;
                }
                Status::Running => return Status::Running,
            }
        }
        // All children succeeded (or there were none).
        self.cursor = 0;
        Status::Success
    }
}

/// Executes child behaviors in order until one succeeds.
///
/// # Semantics
///
/// A `Selector` evaluates its children left to right, resuming at a cursor:
/// - On child `Success` the cursor resets and the selector returns `Success`
///   immediately
/// - On child `Failure` the cursor advances; only after every child has
///   failed does the cursor reset and the selector return `Failure`
/// - On child `Running` the selector returns `Running` without advancing
///
/// A selector with no children fails trivially.
pub struct Selector<C> {
    children: Vec<Node<C>>,
    cursor: usize,
    pub(crate) running: bool,
}

impl<C> Selector<C> {
    /// Creates a new selector with the given child behaviors.
    pub fn new(children: Vec<Node<C>>) -> Self {
        Self {
            children,
            cursor: 0,
            running: false,
        }
    }

    pub(crate) fn children(&self) -> &[Node<C>] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node<C>] {
        &mut self.children
    }

    pub(crate) fn reset(&mut self) {
        self.cursor = 0;
        self.running = false;
        self.children.iter_mut().for_each(Node::reset);
    }
}

impl<C: TickClock> Selector<C> {
    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        while self.cursor < self.children.len() {
            match self.children[self.cursor].tick(ctx) {
                Status::Success => {
                    self.cursor = 0;
                    return Status::Success;
                }
                Status::Failure => self.cursor += 1,
                Status::Running => return Status::Running,
            }
        }
        // All children failed (or there were none).
        self.cursor = 0;
        Status::Failure
    }
}

/// Executes **all** children every tick and aggregates by policy.
///
/// # Semantics
///
/// Every child is ticked, in declaration order, with no early exit. The
/// per-tick success and failure counts are then checked against two
/// independently configured [`Policy`] thresholds:
/// - success policy met ⇒ `Success`
/// - otherwise, failure policy met ⇒ `Failure`
/// - neither met ⇒ `Running`
///
/// The success policy is evaluated first, so success wins when both
/// thresholds are met on the same tick. A terminal result resets the
/// children so the next activation starts a fresh evaluation.
///
/// A parallel with no children succeeds trivially.
pub struct Parallel<C> {
    children: Vec<Node<C>>,
    success_policy: Policy,
    failure_policy: Policy,
    pub(crate) running: bool,
}

impl<C> Parallel<C> {
    /// Creates a new parallel node with the given policies and children.
    pub fn new(success_policy: Policy, failure_policy: Policy, children: Vec<Node<C>>) -> Self {
        Self {
            children,
            success_policy,
            failure_policy,
            running: false,
        }
    }

    /// The configured success policy.
    pub fn success_policy(&self) -> Policy {
        self.success_policy
    }

    /// The configured failure policy.
    pub fn failure_policy(&self) -> Policy {
        self.failure_policy
    }

    pub(crate) fn children(&self) -> &[Node<C>] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Node<C>] {
        &mut self.children
    }

    pub(crate) fn reset(&mut self) {
        self.running = false;
        self.children.iter_mut().for_each(Node::reset);
    }
}

impl<C: TickClock> Parallel<C> {
    pub(crate) fn tick(&mut self, ctx: &mut C) -> Status {
        if self.children.is_empty() {
            return Status::Success;
        }

        let total = self.children.len();
        let mut successes = 0;
        let mut failures = 0;
        for child in &mut self.children {
            match child.tick(ctx) {
                Status::Success => successes += 1,
                Status::Failure => failures += 1,
                Status::Running => {}
            }
        }

        // Success policy first: success wins when both are met this tick.
        if self.success_policy.met(successes, total) {
            self.children.iter_mut().for_each(Node::reset);
            return Status::Success;
        }
        if self.failure_policy.met(failures, total) {
            self.children.iter_mut().for_each(Node::reset);
            return Status::Failure;
        }
        Status::Running
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

    fn increment() -> Node<TestContext> {
        action("increment", |ctx: &mut TestContext| {
            ctx.value += 1;
            Status::Success
        })
    }

    fn fail_always() -> Node<TestContext> {
        action("fail-always", |_: &mut TestContext| Status::Failure)
    }

    fn run_always() -> Node<TestContext> {
        action("run-always", |_: &mut TestContext| Status::Running)
    }

    /// Succeeds only once `threshold` ticks have hit this leaf.
    fn run_then_succeed(threshold: i32) -> Node<TestContext> {
        let mut ticks = 0;
        action("run-then-succeed", move |_: &mut TestContext| {
            ticks += 1;
            if ticks >= threshold {
                Status::Success
            } else {
                Status::Running
            }
        })
    }

    #[test]
    fn sequence_all_success() {
        let mut seq = sequence(vec![increment(), increment()]);

        let mut ctx = TestContext::new();
        assert_eq!(seq.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 2);
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let mut seq = sequence(vec![
            increment(),
            fail_always(),
            increment(), // Should not execute
        ]);

        let mut ctx = TestContext::new();
        assert_eq!(seq.tick(&mut ctx), Status::Failure);
        assert_eq!(ctx.value, 1); // Only first increment executed
    }

    #[test]
    fn sequence_resumes_at_running_child() {
        let mut seq = sequence(vec![increment(), run_then_succeed(2), increment()]);

        let mut ctx = TestContext::new();
        assert_eq!(seq.tick(&mut ctx), Status::Running);
        assert_eq!(ctx.value, 1);

        // Second tick re-enters the second child, not the first.
        assert_eq!(seq.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 2);
    }

    #[test]
    fn sequence_restarts_after_completion() {
        let mut seq = sequence(vec![increment(), increment()]);

        let mut ctx = TestContext::new();
        assert_eq!(seq.tick(&mut ctx), Status::Success);
        assert_eq!(seq.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 4);
    }

    #[test]
    fn empty_sequence_succeeds_trivially() {
        let mut seq = sequence::<TestContext>(vec![]);
        let mut ctx = TestContext::new();
        assert_eq!(seq.tick(&mut ctx), Status::Success);
    }

    #[test]
    fn selector_succeeds_on_first_success() {
        let mut sel = selector(vec![
            fail_always(),
            increment(),
            fail_always(), // Should not execute
        ]);

        let mut ctx = TestContext::new();
        assert_eq!(sel.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.value, 1); // Only Increment executed
    }

    #[test]
    fn selector_fails_when_all_fail() {
        let mut sel = selector(vec![fail_always(), fail_always()]);

        let mut ctx = TestContext::new();
        assert_eq!(sel.tick(&mut ctx), Status::Failure);
    }

    #[test]
    fn selector_resumes_at_running_child() {
        let mut sel = selector(vec![fail_always(), run_then_succeed(2), increment()]);

        let mut ctx = TestContext::new();
        assert_eq!(sel.tick(&mut ctx), Status::Running);
        assert_eq!(sel.tick(&mut ctx), Status::Success);
        // The third child never ran.
        assert_eq!(ctx.value, 0);
    }

    #[test]
    fn empty_selector_fails_trivially() {
        let mut sel = selector::<TestContext>(vec![]);
        let mut ctx = TestContext::new();
        assert_eq!(sel.tick(&mut ctx), Status::Failure);
    }

    #[test]
    fn parallel_require_all_success_require_one_failure() {
        let mut ctx = TestContext::new();

        // {S,S,S} -> Success
        let mut all_succeed = parallel(
            Policy::RequireAll,
            Policy::RequireOne,
            vec![increment(), increment(), increment()],
        );
        assert_eq!(all_succeed.tick(&mut ctx), Status::Success);

        // {S,F,S} -> Failure
        let mut one_fails = parallel(
            Policy::RequireAll,
            Policy::RequireOne,
            vec![increment(), fail_always(), increment()],
        );
        assert_eq!(one_fails.tick(&mut ctx), Status::Failure);

        // {S,R,S} -> Running
        let mut one_runs = parallel(
            Policy::RequireAll,
            Policy::RequireOne,
            vec![increment(), run_always(), increment()],
        );
        assert_eq!(one_runs.tick(&mut ctx), Status::Running);
    }

    #[test]
    fn parallel_success_policy_wins_ties() {
        // One success and one failure, both policies RequireOne: the success
        // policy is evaluated first.
        let mut par = parallel(
            Policy::RequireOne,
            Policy::RequireOne,
            vec![increment(), fail_always()],
        );

        let mut ctx = TestContext::new();
        assert_eq!(par.tick(&mut ctx), Status::Success);
    }

    #[test]
    fn parallel_majority_policy() {
        assert!(Policy::RequireMajority.met(2, 3));
        assert!(!Policy::RequireMajority.met(1, 3));
        assert!(!Policy::RequireMajority.met(2, 4)); // Strict majority
        assert!(Policy::RequireMajority.met(3, 4));
    }

    #[test]
    fn parallel_ticks_every_child_every_tick() {
        let mut par = parallel(
            Policy::RequireAll,
            Policy::RequireAll,
            vec![increment(), run_always()],
        );

        let mut ctx = TestContext::new();
        assert_eq!(par.tick(&mut ctx), Status::Running);
        assert_eq!(par.tick(&mut ctx), Status::Running);
        // The succeeding child ran on both ticks (no early exit).
        assert_eq!(ctx.value, 2);
    }

    #[test]
    fn empty_parallel_succeeds_trivially() {
        let mut par = parallel::<TestContext>(Policy::RequireAll, Policy::RequireOne, vec![]);
        let mut ctx = TestContext::new();
        assert_eq!(par.tick(&mut ctx), Status::Success);
    }
}

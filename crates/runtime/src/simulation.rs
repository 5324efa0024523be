//! Tick-driven simulation loop.
//!
//! One `step` advances the clock by the configured tick interval, ticks
//! every agent in ascending id order, then runs one group coordination pass.
//! Agents run strictly sequentially, so cross-agent effects applied through
//! the world become observable on the next tick.

use crate::clock::SimClock;
use crate::context::SimContext;
use crate::group::GroupCoordinator;

pub struct Simulation {
    context: SimContext,
    clock: SimClock,
    coordinator: GroupCoordinator,
}

impl Simulation {
    pub fn new(context: SimContext) -> Self {
        let coordinator = GroupCoordinator::new(context.config.coordinator.clone());
        Self {
            context,
            clock: SimClock::new(),
            coordinator,
        }
    }

    pub fn context(&self) -> &SimContext {
        &self.context
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Runs one simulation tick.
    pub fn step(&mut self) {
        self.clock.advance(self.context.config.driver.tick_interval_ms);
        let now = self.clock.now_ms();

        self.context.agents.for_each_mut(|agent| {
            agent.tick(now);
        });

        self.coordinator.update_coordination(
            &self.context.groups,
            &self.context.agents,
            &*self.context.world,
        );
    }

    /// Runs `ticks` consecutive steps.
    pub fn run_for(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }
}

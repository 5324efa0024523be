//! Simulation clock.

/// Millisecond clock owned by the simulation driver.
///
/// All timing in the core (attack cooldowns, target re-evaluation
/// intervals, pathfinding rate limits, `Timeout` decorators) reads this
/// clock rather than wall time. The driver advances it by the configured
/// tick interval each step, which keeps runs deterministic and lets tests
/// jump time explicitly.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimClock {
    now_ms: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Advances the clock by `delta_ms`.
    pub fn advance(&mut self, delta_ms: u64) {
        self.now_ms += delta_ms;
    }
}

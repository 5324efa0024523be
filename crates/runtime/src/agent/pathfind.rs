//! Pathfinding interface and the straight-line placeholder strategy.
//!
//! The contract is deliberately minimal: a strategy turns (from, to) into a
//! waypoint list, and the [`PathFinder`] walks those waypoints by delegating
//! each leg to the movement controller. Recomputation is rate-limited by a
//! cooldown. The shipped [`StraightLine`] strategy returns the trivial
//! two-point path; a real search algorithm can be swapped in without
//! changing the calling contract.

use agent_core::Position;

use crate::config::PathfindingConfig;

use super::movement::MovementController;

/// Pluggable path computation strategy.
pub trait PathStrategy: Send + Sync {
    /// Computes a waypoint list from `from` to `to`. An empty result means
    /// no path exists.
    fn compute(&self, from: Position, to: Position) -> Vec<Position>;
}

/// Trivial strategy: the path is the straight segment to the target.
pub struct StraightLine;

impl PathStrategy for StraightLine {
    fn compute(&self, from: Position, to: Position) -> Vec<Position> {
        vec![from, to]
    }
}

/// Per-agent pathfinding subsystem.
pub struct PathFinder {
    strategy: Box<dyn PathStrategy>,
    cooldown_ms: u64,
    last_compute_ms: Option<u64>,
    waypoints: Vec<Position>,
    next_waypoint: usize,
}

impl PathFinder {
    pub fn new(config: &PathfindingConfig) -> Self {
        Self::with_strategy(config, Box::new(StraightLine))
    }

    pub fn with_strategy(config: &PathfindingConfig, strategy: Box<dyn PathStrategy>) -> Self {
        Self {
            strategy,
            cooldown_ms: config.cooldown_ms,
            last_compute_ms: None,
            waypoints: Vec::new(),
            next_waypoint: 0,
        }
    }

    /// Computes a fresh path. Returns false when rate-limited by the
    /// cooldown or when the strategy found no path.
    pub fn find_path(&mut self, from: Position, to: Position, now_ms: u64) -> bool {
        if let Some(last) = self.last_compute_ms
            && now_ms.saturating_sub(last) < self.cooldown_ms
        {
            tracing::trace!("path recomputation on cooldown");
            return false;
        }
        self.last_compute_ms = Some(now_ms);

        let waypoints = self.strategy.compute(from, to);
        if waypoints.is_empty() {
            return false;
        }
        self.waypoints = waypoints;
        self.next_waypoint = 0;
        true
    }

    /// Whether a path with unvisited waypoints is loaded.
    pub fn has_path(&self) -> bool {
        self.next_waypoint < self.waypoints.len()
    }

    /// Current leg of the path, if any.
    pub fn current_waypoint(&self) -> Option<Position> {
        self.waypoints.get(self.next_waypoint).copied()
    }

    /// Advances along the path: skips waypoints already reached and points
    /// the movement controller at the current leg.
    pub fn tick(&mut self, origin: Position, movement: &mut MovementController) {
        while let Some(waypoint) = self.current_waypoint() {
            if origin.distance(waypoint) <= movement.arrival_threshold() {
                self.next_waypoint += 1;
                continue;
            }
            if movement.destination() != Some(waypoint) {
                movement.move_to(waypoint);
            }
            return;
        }
        // Path exhausted.
        if !self.waypoints.is_empty() {
            self.waypoints.clear();
            self.next_waypoint = 0;
        }
    }

    /// Drops the loaded path and the rate-limit state. Part of agent reset.
    pub fn reset(&mut self) {
        self.waypoints.clear();
        self.next_waypoint = 0;
        self.last_compute_ms = None;
    }
}

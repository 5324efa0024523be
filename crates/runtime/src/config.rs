//! Simulation configuration.
//!
//! All tuning knobs live in plain serde structs with sensible defaults, so a
//! simulation can run with `SimConfig::default()` or load overrides from a
//! RON file. Every field documents its unit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level simulation configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub driver: DriverConfig,
    pub agent: AgentConfig,
    pub coordinator: CoordinatorConfig,
}

impl SimConfig {
    /// Parses a config from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Loads a config from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }
}

/// Tick driver settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Simulated time advanced per `Simulation::step`, in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
        }
    }
}

/// Per-agent subsystem settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub targeting: TargetingConfig,
    pub combat: CombatConfig,
    pub movement: MovementConfig,
    pub pathfinding: PathfindingConfig,
    pub modes: ModeConfig,
}

/// Target selection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Re-evaluation interval in milliseconds.
    pub interval_ms: u64,
    /// Maximum target acquisition radius in world units.
    pub max_radius: f64,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_radius: 24.0,
        }
    }
}

/// Combat settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Maximum attack distance in world units.
    pub attack_range: f64,
    /// Damage dealt per attack.
    pub attack_damage: f64,
    /// Minimum time between attacks in milliseconds.
    pub cooldown_ms: u64,
    /// Line-of-sight approximation: attacks beyond this distance are invalid.
    pub los_range: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_range: 3.0,
            attack_damage: 4.0,
            cooldown_ms: 1000,
            los_range: 16.0,
        }
    }
}

/// Movement settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Base movement per tick in world units.
    pub speed: f64,
    /// Distance below which a destination counts as reached.
    pub arrival_threshold: f64,
    /// Speed multiplier for urgent (priority) moves.
    pub urgency_multiplier: f64,
    /// Speed multiplier while waiting for the group to catch up.
    pub slow_multiplier: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 0.6,
            arrival_threshold: 0.75,
            urgency_multiplier: 1.6,
            slow_multiplier: 0.5,
        }
    }
}

/// Pathfinding settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// Minimum time between path recomputations in milliseconds.
    pub cooldown_ms: u64,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self { cooldown_ms: 1000 }
    }
}

/// Mode state machine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Radius around the anchor for patrol waypoints.
    pub patrol_radius: f64,
    /// Radius around the anchor for exploration waypoints.
    pub explore_radius: f64,
    /// Maximum drift from the anchor while defending.
    pub defend_radius: f64,
    /// Follow distance while escorting.
    pub escort_distance: f64,
    /// Distance moved away from a threat when fleeing.
    pub flee_distance: f64,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            patrol_radius: 8.0,
            explore_radius: 24.0,
            defend_radius: 4.0,
            escort_distance: 3.0,
            flee_distance: 12.0,
        }
    }
}

/// Group coordination settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Threat detection radius around the group center.
    pub threat_radius: f64,
    /// Base formation radius; scaled per role.
    pub formation_radius: f64,
    /// Radius of the surround pattern around a single threat.
    pub surround_radius: f64,
    /// Stand-off distance when engaging one of several threats.
    pub engage_distance: f64,
    /// Default maximum spread for newly created groups.
    pub default_max_spread: f64,
    /// Default maximum member count for newly created groups.
    pub default_max_size: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            threat_radius: 16.0,
            formation_radius: 4.0,
            surround_radius: 2.5,
            engage_distance: 2.0,
            default_max_spread: 12.0,
            default_max_size: 8,
        }
    }
}

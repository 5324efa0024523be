//! Topic-based event bus and the training boundary.
//!
//! Decision outcomes leave the core as experience tuples
//! `(state_hash, action, reward, next_state_hash)` published on the
//! [`Topic::Experience`] channel. External trainers subscribe and consume;
//! the core never depends on them. Publishing is best-effort: with no
//! subscribers, events are dropped silently.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use agent_core::{AgentId, Position};

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Decision outcomes for external trainers.
    Experience,
    /// Agent spawn/despawn notifications.
    Lifecycle,
}

/// The decision an experience tuple describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DecisionAction {
    SelectTarget,
    Attack,
}

/// One `(state, action, reward, next state)` tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub agent: AgentId,
    pub state_hash: u64,
    pub action: DecisionAction,
    pub reward: f64,
    pub next_state_hash: u64,
}

/// Agent lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Spawned { agent: AgentId },
    Despawned { agent: AgentId },
}

/// Event wrapper carrying the topic and typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Experience(Experience),
    Lifecycle(LifecycleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Experience(_) => Topic::Experience,
            Event::Lifecycle(_) => Topic::Lifecycle,
        }
    }
}

/// Topic-based event bus.
///
/// One broadcast channel per topic, created up front. Cloning the bus clones
/// the senders, so every agent can hold a handle cheaply.
#[derive(Clone)]
pub struct EventBus {
    channels: HashMap<Topic, broadcast::Sender<Event>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with the specified capacity per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        channels.insert(Topic::Experience, broadcast::channel(capacity).0);
        channels.insert(Topic::Lifecycle, broadcast::channel(capacity).0);
        Self { channels }
    }

    /// Publishes an event to its topic. Best-effort: no subscribers is
    /// normal, not an error.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            tracing::trace!(?topic, "no subscribers for topic");
        }
    }

    /// Subscribes to a specific topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels
            .get(&topic)
            .unwrap_or_else(|| unreachable!("all topic channels are created in the constructor"))
            .subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic hash of an agent's observed situation.
///
/// Continuous quantities are bucketed so that nearby situations collapse
/// onto the same state id: positions to half-unit cells, health to
/// five-point bands, target distance to one-unit rings.
pub fn observation_hash(
    agent: AgentId,
    position: Position,
    health: f64,
    target_distance: Option<f64>,
    target_health: Option<f64>,
) -> u64 {
    let mut hasher = std::hash::DefaultHasher::new();
    agent.hash(&mut hasher);
    quantize(position.x, 0.5).hash(&mut hasher);
    quantize(position.y, 0.5).hash(&mut hasher);
    quantize(position.z, 0.5).hash(&mut hasher);
    quantize(health, 5.0).hash(&mut hasher);
    target_distance.map(|d| quantize(d, 1.0)).hash(&mut hasher);
    target_health.map(|h| quantize(h, 5.0)).hash(&mut hasher);
    hasher.finish()
}

fn quantize(value: f64, bucket: f64) -> i64 {
    (value / bucket).floor() as i64
}

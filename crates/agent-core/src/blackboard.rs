//! Per-agent key/value scratch space.
//!
//! Behavior tree nodes communicate across ticks through the agent's
//! blackboard: one node stores a chosen location or entity, another reads it
//! later. Keys are agent-local strings with last-write-wins semantics. The
//! blackboard lives as long as the agent and is cleared only on agent reset.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;
use crate::position::Position;

/// An opaque blackboard value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Reference to a world entity (weak: resolved through the world view,
    /// never assumed persistent).
    Entity(EntityId),
    /// A world location.
    Location(Position),
    /// A numeric value.
    Number(f64),
    /// A boolean flag.
    Flag(bool),
    /// Free-form text.
    Text(String),
}

/// Per-agent mutable key/value store for inter-node communication.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Blackboard {
    entries: HashMap<String, Value>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Removes and returns the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Clears every entry. Called on agent reset, never mid-lifetime.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------

    /// Reads an entity reference, if the key holds one.
    pub fn entity(&self, key: &str) -> Option<EntityId> {
        match self.entries.get(key) {
            Some(Value::Entity(id)) => Some(*id),
            _ => None,
        }
    }

    /// Reads a location, if the key holds one.
    pub fn location(&self, key: &str) -> Option<Position> {
        match self.entries.get(key) {
            Some(Value::Location(pos)) => Some(*pos),
            _ => None,
        }
    }

    /// Reads a number, if the key holds one.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.entries.get(key) {
            Some(Value::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Reads a flag, if the key holds one.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(Value::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// Reads text, if the key holds some.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut bb = Blackboard::new();
        bb.set("threat", Value::Entity(EntityId(1)));
        bb.set("threat", Value::Entity(EntityId(2)));
        assert_eq!(bb.entity("threat"), Some(EntityId(2)));
        assert_eq!(bb.len(), 1);
    }

    #[test]
    fn typed_accessors_reject_mismatched_kinds() {
        let mut bb = Blackboard::new();
        bb.set("rally", Value::Location(Position::new(1.0, 2.0, 3.0)));
        assert!(bb.location("rally").is_some());
        assert!(bb.entity("rally").is_none());
        assert!(bb.number("rally").is_none());
    }

    #[test]
    fn clear_empties_the_store() {
        let mut bb = Blackboard::new();
        bb.set("flag", Value::Flag(true));
        bb.clear();
        assert!(bb.is_empty());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut bb = Blackboard::new();
        bb.set("threat", Value::Entity(EntityId(7)));
        bb.set("rally", Value::Location(Position::new(4.0, 0.0, -2.0)));
        bb.set("note", Value::Text("holding".into()));

        let json = serde_json::to_string(&bb).unwrap();
        let restored: Blackboard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.entity("threat"), Some(EntityId(7)));
        assert_eq!(restored.text("note"), Some("holding"));
    }
}

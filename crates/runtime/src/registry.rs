//! Agent registry.
//!
//! The arena that owns every live [`Agent`]. Agents never hold references to
//! each other; cross-agent work goes through ids resolved here, under a
//! single lock. A poisoned lock is recovered rather than propagated since
//! agent state stays valid across a panicked tick.

use std::collections::HashMap;
use std::sync::RwLock;

use agent_core::AgentId;

use crate::agent::Agent;
use crate::error::{Result, RuntimeError};

#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<AgentId, Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an agent. Fails when the id is already taken.
    pub fn register(&self, agent: Agent) -> Result<()> {
        let mut agents = self.write();
        let id = agent.id();
        if agents.contains_key(&id) {
            return Err(RuntimeError::AlreadyRegistered(id));
        }
        agents.insert(id, agent);
        Ok(())
    }

    /// Removes and returns an agent.
    pub fn unregister(&self, id: AgentId) -> Result<Agent> {
        self.write()
            .remove(&id)
            .ok_or(RuntimeError::AgentNotFound(id))
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Ids of all registered agents, in ascending order so iteration stays
    /// deterministic.
    pub fn ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.read().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Runs a closure against one agent.
    pub fn with_agent<T>(&self, id: AgentId, f: impl FnOnce(&Agent) -> T) -> Result<T> {
        let agents = self.read();
        let agent = agents.get(&id).ok_or(RuntimeError::AgentNotFound(id))?;
        Ok(f(agent))
    }

    /// Runs a closure against one agent, mutably.
    pub fn with_agent_mut<T>(&self, id: AgentId, f: impl FnOnce(&mut Agent) -> T) -> Result<T> {
        let mut agents = self.write();
        let agent = agents.get_mut(&id).ok_or(RuntimeError::AgentNotFound(id))?;
        Ok(f(agent))
    }

    /// Visits every agent mutably, in ascending id order.
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut Agent)) {
        let mut agents = self.write();
        let mut ids: Vec<AgentId> = agents.keys().copied().collect();
        ids.sort();
        for id in ids {
            if let Some(agent) = agents.get_mut(&id) {
                f(agent);
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<AgentId, Agent>> {
        self.agents.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<AgentId, Agent>> {
        self.agents.write().unwrap_or_else(|e| e.into_inner())
    }
}

//! Shared simulation context.
//!
//! Explicit bundle of every collaborator the simulation needs: the world
//! handle, the agent and group registries, the event bus, and configuration.
//! There are no globals; everything that wants these dependencies receives
//! them from here.

use std::sync::Arc;

use agent_core::{AgentId, WorldView};

use crate::agent::Agent;
use crate::behavior::TreeSpec;
use crate::config::SimConfig;
use crate::error::Result;
use crate::events::{Event, EventBus, LifecycleEvent};
use crate::group::GroupRegistry;
use crate::registry::AgentRegistry;
use crate::snapshot::AgentSnapshot;

pub struct SimContext {
    pub world: Arc<dyn WorldView>,
    pub agents: AgentRegistry,
    pub groups: GroupRegistry,
    pub events: EventBus,
    pub config: SimConfig,
}

impl SimContext {
    pub fn new(world: Arc<dyn WorldView>, config: SimConfig) -> Self {
        Self {
            world,
            agents: AgentRegistry::new(),
            groups: GroupRegistry::new(),
            events: EventBus::new(),
            config,
        }
    }

    /// Creates and registers an agent from a tree descriptor, announcing it
    /// on the lifecycle topic.
    pub fn spawn_agent(&self, id: AgentId, spec: TreeSpec) -> Result<()> {
        let agent = Agent::new(
            id,
            spec,
            Arc::clone(&self.world),
            self.events.clone(),
            &self.config.agent,
        )?;
        self.agents.register(agent)?;
        tracing::info!(agent = %id, "agent spawned");
        self.events
            .publish(Event::Lifecycle(LifecycleEvent::Spawned { agent: id }));
        Ok(())
    }

    /// Registers an agent rebuilt from a snapshot, announcing it on the
    /// lifecycle topic.
    pub fn restore_agent(&self, snapshot: AgentSnapshot) -> Result<()> {
        let id = snapshot.id;
        let agent = Agent::restore(
            snapshot,
            Arc::clone(&self.world),
            self.events.clone(),
            &self.config.agent,
        )?;
        self.agents.register(agent)?;
        tracing::info!(agent = %id, "agent restored");
        self.events
            .publish(Event::Lifecycle(LifecycleEvent::Spawned { agent: id }));
        Ok(())
    }

    /// Removes an agent from the registry and any group, announcing the
    /// departure. The removed agent is returned so a caller can snapshot it.
    pub fn despawn_agent(&self, id: AgentId) -> Result<Agent> {
        let agent = self.agents.unregister(id)?;
        let _ = self.groups.unassign(id);
        tracing::info!(agent = %id, "agent despawned");
        self.events
            .publish(Event::Lifecycle(LifecycleEvent::Despawned { agent: id }));
        Ok(agent)
    }
}

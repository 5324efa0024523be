//! Multi-agent groups.
//!
//! A [`Group`] is a membership roster with a shared objective and a cached
//! center. Members are ids, never agent references; the coordinator resolves
//! them through the agent registry when it steers. The [`GroupRegistry`]
//! enforces single membership: assigning an agent to a group silently
//! removes it from its previous one.

pub mod coordinator;

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use agent_core::{AgentId, GroupId, Position};

use crate::error::{Result, RuntimeError};

pub use coordinator::GroupCoordinator;

/// A member's role within its group. Roles scale formation slots and decide
/// who participates in divide-and-conquer assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum GroupRole {
    Leader,
    Scout,
    Guard,
    Attacker,
    Healer,
    Support,
}

impl GroupRole {
    /// Multiplier applied to the base formation radius.
    pub fn formation_scale(self) -> f64 {
        match self {
            GroupRole::Scout => 1.5,
            GroupRole::Guard => 0.7,
            _ => 1.0,
        }
    }

    /// Whether this role engages threats during divide-and-conquer.
    pub fn is_combatant(self) -> bool {
        !matches!(self, GroupRole::Healer | GroupRole::Support)
    }
}

/// What the group as a whole is doing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum GroupObjective {
    #[default]
    Patrol,
    Combat,
    Explore,
    Defend,
    Escort,
}

/// A roster of agents acting together.
pub struct Group {
    id: GroupId,
    members: Vec<(AgentId, GroupRole)>,
    /// Centroid of member positions, refreshed by the coordinator.
    pub center: Position,
    pub objective: GroupObjective,
    max_size: usize,
    max_spread: f64,
}

impl Group {
    pub fn new(id: GroupId, max_size: usize, max_spread: f64) -> Self {
        Self {
            id,
            members: Vec::new(),
            center: Position::ORIGIN,
            objective: GroupObjective::default(),
            max_size,
            max_spread,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn members(&self) -> &[(AgentId, GroupRole)] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_size
    }

    /// Maximum distance a member may drift from the center before the
    /// coordinator recalls it.
    pub fn max_spread(&self) -> f64 {
        self.max_spread
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.iter().any(|(id, _)| *id == agent)
    }

    pub fn role_of(&self, agent: AgentId) -> Option<GroupRole> {
        self.members
            .iter()
            .find(|(id, _)| *id == agent)
            .map(|(_, role)| *role)
    }

    /// The first member holding the Leader role.
    pub fn leader(&self) -> Option<AgentId> {
        self.members
            .iter()
            .find(|(_, role)| *role == GroupRole::Leader)
            .map(|(id, _)| *id)
    }

    pub(crate) fn add_member(&mut self, agent: AgentId, role: GroupRole) -> Result<()> {
        if self.is_full() {
            return Err(RuntimeError::GroupFull(self.id));
        }
        self.members.push((agent, role));
        Ok(())
    }

    pub(crate) fn remove_member(&mut self, agent: AgentId) -> bool {
        let before = self.members.len();
        self.members.retain(|(id, _)| *id != agent);
        self.members.len() != before
    }
}

#[derive(Default)]
struct RegistryInner {
    groups: HashMap<GroupId, Group>,
    membership: HashMap<AgentId, GroupId>,
    next_id: u32,
}

/// Owns every group and the single-membership index.
#[derive(Default)]
pub struct GroupRegistry {
    inner: RwLock<RegistryInner>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty group and returns its id.
    pub fn create_group(&self, max_size: usize, max_spread: f64) -> GroupId {
        let mut inner = self.write();
        let id = GroupId(inner.next_id);
        inner.next_id += 1;
        inner.groups.insert(id, Group::new(id, max_size, max_spread));
        tracing::debug!(group = %id, "group created");
        id
    }

    /// Removes a group, releasing all its members.
    pub fn disband(&self, id: GroupId) -> Result<Group> {
        let mut inner = self.write();
        let group = inner
            .groups
            .remove(&id)
            .ok_or(RuntimeError::GroupNotFound(id))?;
        inner.membership.retain(|_, g| *g != id);
        tracing::debug!(group = %id, "group disbanded");
        Ok(group)
    }

    /// Puts an agent into a group with a role.
    ///
    /// An agent already in another group is moved, not duplicated.
    pub fn assign(&self, agent: AgentId, group: GroupId, role: GroupRole) -> Result<()> {
        let mut inner = self.write();
        {
            let target = inner
                .groups
                .get(&group)
                .ok_or(RuntimeError::GroupNotFound(group))?;
            // Reject before detaching from the previous group so a failed
            // assignment leaves membership untouched.
            if target.is_full() && !target.contains(agent) {
                return Err(RuntimeError::GroupFull(group));
            }
        }
        if let Some(previous) = inner.membership.get(&agent).copied()
            && previous != group
            && let Some(old) = inner.groups.get_mut(&previous)
        {
            old.remove_member(agent);
        }
        let target = inner
            .groups
            .get_mut(&group)
            .ok_or(RuntimeError::GroupNotFound(group))?;
        if !target.contains(agent) {
            target.add_member(agent, role)?;
        }
        inner.membership.insert(agent, group);
        Ok(())
    }

    /// Removes an agent from whatever group it is in.
    pub fn unassign(&self, agent: AgentId) -> Option<GroupId> {
        let mut inner = self.write();
        let group = inner.membership.remove(&agent)?;
        if let Some(g) = inner.groups.get_mut(&group) {
            g.remove_member(agent);
        }
        Some(group)
    }

    pub fn group_of(&self, agent: AgentId) -> Option<GroupId> {
        self.read().membership.get(&agent).copied()
    }

    /// Ids of all groups, in ascending order.
    pub fn ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.read().groups.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read().groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().groups.is_empty()
    }

    /// Runs a closure against one group.
    pub fn with_group<T>(&self, id: GroupId, f: impl FnOnce(&Group) -> T) -> Result<T> {
        let inner = self.read();
        let group = inner.groups.get(&id).ok_or(RuntimeError::GroupNotFound(id))?;
        Ok(f(group))
    }

    /// Runs a closure against one group, mutably.
    pub fn with_group_mut<T>(&self, id: GroupId, f: impl FnOnce(&mut Group) -> T) -> Result<T> {
        let mut inner = self.write();
        let group = inner
            .groups
            .get_mut(&id)
            .ok_or(RuntimeError::GroupNotFound(id))?;
        Ok(f(group))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

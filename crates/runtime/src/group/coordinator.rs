//! Group coordination pass.
//!
//! Runs once per simulation tick, after every member has ticked. For each
//! group it refreshes the center, scans for threats around it, and steers
//! members through the agent controller surface only. Steering covers three
//! situations: no threats (role-scaled formation around the center), one
//! threat (even surround ring), several threats (divide and conquer with a
//! stand-off point per attacker). A cohesion pass recalls members that
//! drifted past the group's maximum spread and slows the rest down until the
//! stragglers catch up.

use std::f64::consts::TAU;

use agent_core::{AgentId, EntityId, GroupId, Position, WorldView};

use crate::config::CoordinatorConfig;
use crate::registry::AgentRegistry;

use super::{GroupObjective, GroupRegistry, GroupRole};

/// Evenly spaced ring of `count` positions around `center`.
pub fn surround_positions(center: Position, radius: f64, count: usize) -> Vec<Position> {
    (0..count)
        .map(|i| {
            let angle = i as f64 * TAU / count.max(1) as f64;
            center.offset(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

/// Stateless coordinator over the group and agent registries.
pub struct GroupCoordinator {
    config: CoordinatorConfig,
}

impl GroupCoordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Runs one coordination pass over every group.
    pub fn update_coordination(
        &self,
        groups: &GroupRegistry,
        agents: &AgentRegistry,
        world: &dyn WorldView,
    ) {
        for group_id in groups.ids() {
            // Snapshot the roster, then steer without holding the group lock.
            let roster = match groups.with_group(group_id, |g| {
                (g.members().to_vec(), g.max_spread(), g.objective)
            }) {
                Ok(snapshot) => snapshot,
                Err(_) => continue,
            };
            let (members, max_spread, objective) = roster;
            if members.is_empty() {
                continue;
            }

            let positions: Vec<(AgentId, GroupRole, Position)> = members
                .iter()
                .filter_map(|&(id, role)| {
                    let position = agents.with_agent(id, |a| a.position()).ok()?;
                    Some((id, role, position))
                })
                .collect();
            let Some(center) =
                Position::centroid(&positions.iter().map(|(_, _, p)| *p).collect::<Vec<_>>())
            else {
                continue;
            };

            let threats = self.detect_threats(&positions, center, world);
            let next_objective = match (threats.is_empty(), objective) {
                (false, _) => GroupObjective::Combat,
                (true, GroupObjective::Combat) => GroupObjective::Patrol,
                (true, current) => current,
            };
            let _ = groups.with_group_mut(group_id, |g| {
                g.center = center;
                g.objective = next_objective;
            });

            match threats.len() {
                0 => {
                    if next_objective == GroupObjective::Patrol {
                        self.steer_formation(&positions, center, agents);
                    }
                }
                1 => self.steer_surround(group_id, &positions, threats[0], agents, world),
                _ => self.steer_divide(group_id, &positions, &threats, center, agents, world),
            }

            self.enforce_cohesion(&positions, center, max_spread, agents);
        }
    }

    /// Hostile, living entities within the threat radius of the center.
    /// Member entities never count as threats.
    fn detect_threats(
        &self,
        members: &[(AgentId, GroupRole, Position)],
        center: Position,
        world: &dyn WorldView,
    ) -> Vec<EntityId> {
        let Some(&(representative, _, _)) = members.first() else {
            return Vec::new();
        };
        let representative = EntityId::from(representative);

        let mut threats: Vec<EntityId> = world
            .nearby_entities(center, self.config.threat_radius)
            .into_iter()
            .filter(|entity| {
                !members
                    .iter()
                    .any(|&(member, _, _)| EntityId::from(member) == *entity)
            })
            .filter(|&entity| world.is_hostile(representative, entity) && world.is_alive(entity))
            .collect();
        threats.sort();
        threats
    }

    /// Role-scaled formation ring around the group center.
    fn steer_formation(
        &self,
        members: &[(AgentId, GroupRole, Position)],
        center: Position,
        agents: &AgentRegistry,
    ) {
        let count = members.len();
        for (index, &(id, role, _)) in members.iter().enumerate() {
            let angle = index as f64 * TAU / count as f64;
            let radius = self.config.formation_radius * role.formation_scale();
            let slot = center.offset(angle.cos() * radius, 0.0, angle.sin() * radius);
            let _ = agents.with_agent_mut(id, |a| a.move_towards(slot));
        }
    }

    /// Single threat: all members take an even ring around it, combatants
    /// lock their target onto it.
    fn steer_surround(
        &self,
        group: GroupId,
        members: &[(AgentId, GroupRole, Position)],
        threat: EntityId,
        agents: &AgentRegistry,
        world: &dyn WorldView,
    ) {
        let Some(threat_pos) = world.location_of(threat) else {
            return;
        };
        tracing::debug!(%group, %threat, "surrounding single threat");

        let slots = surround_positions(threat_pos, self.config.surround_radius, members.len());
        for (&(id, role, _), slot) in members.iter().zip(slots) {
            let _ = agents.with_agent_mut(id, |a| {
                a.move_towards(slot);
                if role.is_combatant() {
                    a.set_target(threat);
                }
            });
        }
    }

    /// Several threats: combatants are spread over them round-robin, each
    /// taking a stand-off point on its own side of the assigned threat.
    /// Non-combatants fall back to the center.
    fn steer_divide(
        &self,
        group: GroupId,
        members: &[(AgentId, GroupRole, Position)],
        threats: &[EntityId],
        center: Position,
        agents: &AgentRegistry,
        world: &dyn WorldView,
    ) {
        tracing::debug!(%group, threats = threats.len(), "dividing over threats");

        let mut next_threat = 0usize;
        for &(id, role, position) in members {
            if !role.is_combatant() {
                let _ = agents.with_agent_mut(id, |a| a.move_towards(center));
                continue;
            }

            let threat = threats[next_threat % threats.len()];
            next_threat += 1;
            let Some(threat_pos) = world.location_of(threat) else {
                continue;
            };

            // Stand-off point between the threat and the member.
            let (dx, dy, dz) = threat_pos.direction_to(position).unwrap_or((1.0, 0.0, 0.0));
            let engage = self.config.engage_distance;
            let stand_off = threat_pos.offset(dx * engage, dy * engage, dz * engage);

            let _ = agents.with_agent_mut(id, |a| {
                a.set_target(threat);
                a.move_towards(stand_off);
            });
        }
    }

    /// Recalls stragglers and slows everyone else while any exist.
    fn enforce_cohesion(
        &self,
        members: &[(AgentId, GroupRole, Position)],
        center: Position,
        max_spread: f64,
        agents: &AgentRegistry,
    ) {
        let isolated: Vec<AgentId> = members
            .iter()
            .filter(|(_, _, position)| position.distance(center) > max_spread)
            .map(|(id, _, _)| *id)
            .collect();

        for &(id, _, _) in members {
            if isolated.contains(&id) {
                let _ = agents.with_agent_mut(id, |a| {
                    a.set_urgent(true);
                    a.move_towards(center);
                    a.set_waiting_for_group(false);
                });
            } else {
                let _ = agents.with_agent_mut(id, |a| {
                    a.set_waiting_for_group(!isolated.is_empty());
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::behavior::presets;
    use crate::config::AgentConfig;
    use crate::events::EventBus;
    use crate::agent::Agent;
    use crate::world::InMemoryWorld;

    fn setup(
        member_positions: &[Position],
    ) -> (Arc<InMemoryWorld>, AgentRegistry, GroupRegistry, GroupId) {
        let world = Arc::new(InMemoryWorld::new());
        let agents = AgentRegistry::new();
        let groups = GroupRegistry::new();
        let group = groups.create_group(8, 12.0);
        let events = EventBus::new();
        let config = AgentConfig::default();

        for (i, &position) in member_positions.iter().enumerate() {
            let id = AgentId(i as u64 + 1);
            world.spawn(EntityId::from(id), position, 100.0, 0);
            let agent = Agent::new(
                id,
                presets::sentinel(),
                world.clone(),
                events.clone(),
                &config,
            )
            .unwrap();
            agents.register(agent).unwrap();
            let role = if i == 0 {
                GroupRole::Leader
            } else {
                GroupRole::Attacker
            };
            groups.assign(id, group, role).unwrap();
        }
        (world, agents, groups, group)
    }

    #[test]
    fn surround_ring_is_evenly_spaced() {
        let center = Position::ORIGIN;
        let slots = surround_positions(center, 2.5, 4);
        assert_eq!(slots.len(), 4);

        // Four slots are a quarter turn apart: consecutive angular gaps of
        // 90 degrees, every slot on the ring.
        for (i, slot) in slots.iter().enumerate() {
            assert!((center.distance(*slot) - 2.5).abs() < 1e-9);
            let angle = slot.z.atan2(slot.x).rem_euclid(TAU);
            let expected = i as f64 * TAU / 4.0;
            assert!((angle - expected).abs() < 1e-9, "slot {i} at angle {angle}");
        }
    }

    #[test]
    fn single_threat_switches_the_group_to_combat() {
        let (world, agents, groups, group) = setup(&[
            Position::new(0.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
            Position::new(0.0, 0.0, 2.0),
            Position::new(2.0, 0.0, 2.0),
        ]);
        world.spawn(EntityId(100), Position::new(5.0, 0.0, 5.0), 50.0, 1);

        let coordinator = GroupCoordinator::new(CoordinatorConfig::default());
        coordinator.update_coordination(&groups, &agents, &*world);

        assert_eq!(
            groups.with_group(group, |g| g.objective).unwrap(),
            GroupObjective::Combat
        );
        // Every member was pointed at the threat.
        for id in agents.ids() {
            assert!(agents.with_agent(id, |a| a.has_target()).unwrap());
        }
    }

    #[test]
    fn clearing_the_field_returns_the_group_to_patrol() {
        let (world, agents, groups, group) = setup(&[
            Position::new(0.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
        ]);
        world.spawn(EntityId(100), Position::new(5.0, 0.0, 0.0), 50.0, 1);

        let coordinator = GroupCoordinator::new(CoordinatorConfig::default());
        coordinator.update_coordination(&groups, &agents, &*world);
        assert_eq!(
            groups.with_group(group, |g| g.objective).unwrap(),
            GroupObjective::Combat
        );

        world.despawn(EntityId(100));
        coordinator.update_coordination(&groups, &agents, &*world);
        assert_eq!(
            groups.with_group(group, |g| g.objective).unwrap(),
            GroupObjective::Patrol
        );
    }

    #[test]
    fn stragglers_are_recalled_and_the_rest_wait() {
        let (_, agents, groups, _) = setup(&[
            Position::new(0.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
            // Center lands near x = 10.7, putting only this member past the
            // 12.0 max spread.
            Position::new(30.0, 0.0, 0.0),
        ]);

        let coordinator = GroupCoordinator::new(CoordinatorConfig::default());
        let world = InMemoryWorld::new();
        coordinator.update_coordination(&groups, &agents, &world);

        let straggler = AgentId(3);
        assert!(agents
            .with_agent(straggler, |a| a.ctx().movement.is_urgent())
            .unwrap());
        assert!(agents
            .with_agent(AgentId(1), |a| a.ctx().movement.is_waiting_for_group())
            .unwrap());
    }
}

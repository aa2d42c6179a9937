/*
 * Agent Store Module
 *
 * The simulation never owns agents. It reads and writes them through the
 * AgentStore trait, which exposes group membership, each group's shared
 * behaviour parameters and per-group agent slices. FlockStore is the plain
 * Vec-backed store used by the viewer, the benchmarks and the tests.
 */

use glam::{Quat, Vec3};

use crate::agent::{Agent, AgentId};
use crate::error::ConfigError;
use crate::params::BehaviorParameters;

/// Key of an agent group. All agents of a group share one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

/// Boundary between the simulation and whatever owns the agents.
///
/// Membership and parameters may change between ticks, never during one; the
/// driver holds `&mut` access for the whole tick.
pub trait AgentStore {
    fn group_ids(&self) -> Vec<GroupId>;

    fn parameters(&self, group: GroupId) -> Option<&BehaviorParameters>;

    /// Agents of `group`; empty for unknown groups.
    fn agents(&self, group: GroupId) -> &[Agent];

    /// Mutable agents of `group`, in the same order as [`AgentStore::agents`].
    fn agents_mut(&mut self, group: GroupId) -> &mut [Agent];
}

#[derive(Debug)]
struct Group {
    id: GroupId,
    params: BehaviorParameters,
    agents: Vec<Agent>,
}

#[derive(Debug, Default)]
pub struct FlockStore {
    groups: Vec<Group>,
    next_group: u32,
    next_agent: u64,
}

impl FlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, empty group. The parameters are validated up front.
    pub fn add_group(&mut self, params: BehaviorParameters) -> Result<GroupId, ConfigError> {
        params.validate()?;
        let id = GroupId(self.next_group);
        self.next_group += 1;
        self.groups.push(Group {
            id,
            params,
            agents: Vec::new(),
        });
        Ok(id)
    }

    pub fn remove_group(&mut self, group: GroupId) -> Option<Vec<Agent>> {
        let index = self.groups.iter().position(|g| g.id == group)?;
        Some(self.groups.remove(index).agents)
    }

    /// Replace a group's parameters between ticks.
    pub fn set_parameters(&mut self, group: GroupId, params: BehaviorParameters) -> Result<(), ConfigError> {
        params.validate()?;
        let entry = self.group_mut(group).ok_or(ConfigError::UnknownGroup(group))?;
        entry.params = params;
        Ok(())
    }

    pub fn spawn(&mut self, group: GroupId, position: Vec3, orientation: Quat) -> Result<AgentId, ConfigError> {
        let id = AgentId(self.next_agent);
        let entry = self.group_mut(group).ok_or(ConfigError::UnknownGroup(group))?;
        entry.agents.push(Agent::new(id, position, orientation));
        self.next_agent += 1;
        Ok(id)
    }

    pub fn despawn(&mut self, group: GroupId, agent: AgentId) -> Option<Agent> {
        let entry = self.group_mut(group)?;
        let index = entry.agents.iter().position(|a| a.id == agent)?;
        Some(entry.agents.swap_remove(index))
    }

    pub fn clear_agents(&mut self, group: GroupId) {
        if let Some(entry) = self.group_mut(group) {
            entry.agents.clear();
        }
    }

    pub fn agent_count(&self) -> usize {
        self.groups.iter().map(|g| g.agents.len()).sum()
    }

    fn group(&self, group: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group)
    }

    fn group_mut(&mut self, group: GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == group)
    }
}

impl AgentStore for FlockStore {
    fn group_ids(&self) -> Vec<GroupId> {
        self.groups.iter().map(|g| g.id).collect()
    }

    fn parameters(&self, group: GroupId) -> Option<&BehaviorParameters> {
        self.group(group).map(|g| &g.params)
    }

    fn agents(&self, group: GroupId) -> &[Agent] {
        self.group(group).map(|g| g.agents.as_slice()).unwrap_or(&[])
    }

    fn agents_mut(&mut self, group: GroupId) -> &mut [Agent] {
        self.group_mut(group)
            .map(|g| g.agents.as_mut_slice())
            .unwrap_or(&mut [])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_isolated() {
        let mut store = FlockStore::new();
        let a = store.add_group(BehaviorParameters::default()).unwrap();
        let b = store.add_group(BehaviorParameters::default()).unwrap();

        store.spawn(a, Vec3::ZERO, Quat::IDENTITY).unwrap();
        store.spawn(a, Vec3::X, Quat::IDENTITY).unwrap();
        store.spawn(b, Vec3::Y, Quat::IDENTITY).unwrap();

        assert_eq!(store.group_ids(), vec![a, b]);
        assert_eq!(store.agents(a).len(), 2);
        assert_eq!(store.agents(b).len(), 1);
        assert_eq!(store.agent_count(), 3);
    }

    #[test]
    fn agent_ids_are_unique_across_groups() {
        let mut store = FlockStore::new();
        let a = store.add_group(BehaviorParameters::default()).unwrap();
        let b = store.add_group(BehaviorParameters::default()).unwrap();

        let first = store.spawn(a, Vec3::ZERO, Quat::IDENTITY).unwrap();
        let second = store.spawn(b, Vec3::ZERO, Quat::IDENTITY).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn invalid_parameters_are_refused() {
        let mut store = FlockStore::new();
        let bad = BehaviorParameters {
            partition_cell_size: 0.0,
            ..Default::default()
        };
        assert!(store.add_group(bad.clone()).is_err());

        let group = store.add_group(BehaviorParameters::default()).unwrap();
        assert!(store.set_parameters(group, bad).is_err());
        assert_eq!(store.parameters(group), Some(&BehaviorParameters::default()));
    }

    #[test]
    fn unknown_group_is_reported() {
        let mut store = FlockStore::new();
        let missing = GroupId(42);
        assert_eq!(
            store.spawn(missing, Vec3::ZERO, Quat::IDENTITY),
            Err(ConfigError::UnknownGroup(missing))
        );
        assert!(store.agents(missing).is_empty());
        assert!(store.agents_mut(missing).is_empty());
    }

    #[test]
    fn despawn_and_remove_group() {
        let mut store = FlockStore::new();
        let group = store.add_group(BehaviorParameters::default()).unwrap();
        let id = store.spawn(group, Vec3::ZERO, Quat::IDENTITY).unwrap();

        assert_eq!(store.despawn(group, id).map(|a| a.id), Some(id));
        assert!(store.despawn(group, id).is_none());

        assert!(store.remove_group(group).is_some());
        assert!(store.group_ids().is_empty());
    }
}

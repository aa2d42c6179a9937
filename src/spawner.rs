/*
 * Spawner Module
 *
 * Fills a group with agents scattered inside the group's bounds. Positions are
 * `bounds_center + bounds_size * U(-1, 1)` per axis and every agent starts with a
 * random yaw, so a freshly spawned flock heads off in assorted directions.
 * Spawns are seeded, which makes a given seed reproduce the same flock.
 */

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::agent::AgentId;
use crate::error::ConfigError;
use crate::params::BehaviorParameters;
use crate::store::{AgentStore, FlockStore, GroupId};

pub const DEFAULT_SEED: u64 = 100;

// Yaw range in radians
const MAX_SPAWN_YAW: f32 = 20.0;

pub struct Spawner {
    rng: StdRng,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn position(&mut self, params: &BehaviorParameters) -> Vec3 {
        let unit = Vec3::new(
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
        );
        params.bounds_center + params.bounds_size * unit
    }

    pub fn orientation(&mut self) -> Quat {
        Quat::from_rotation_y(self.rng.gen_range(-MAX_SPAWN_YAW..=MAX_SPAWN_YAW))
    }

    /// Add `count` agents to `group`, placed according to the group's parameters.
    pub fn spawn_group(&mut self, store: &mut FlockStore, group: GroupId, count: usize) -> Result<Vec<AgentId>, ConfigError> {
        let params = store
            .parameters(group)
            .cloned()
            .ok_or(ConfigError::UnknownGroup(group))?;

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let position = self.position(&params);
            let orientation = self.orientation();
            ids.push(store.spawn(group, position, orientation)?);
        }

        debug!(group = group.0, count, "spawned agents");
        Ok(ids)
    }

    /// Replace every agent of `group` with a fresh spawn of `count` agents.
    pub fn respawn_group(&mut self, store: &mut FlockStore, group: GroupId, count: usize) -> Result<Vec<AgentId>, ConfigError> {
        store.clear_agents(group);
        self.spawn_group(store, group, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_agents_stay_inside_bounds() {
        let params = BehaviorParameters {
            bounds_center: Vec3::new(10.0, 0.0, -5.0),
            bounds_size: Vec3::new(4.0, 2.0, 8.0),
            ..Default::default()
        };
        let mut store = FlockStore::new();
        let group = store.add_group(params.clone()).unwrap();
        let mut spawner = Spawner::default();

        let ids = spawner.spawn_group(&mut store, group, 200).unwrap();
        assert_eq!(ids.len(), 200);

        for agent in store.agents(group) {
            let offset = (agent.position - params.bounds_center).abs();
            assert!(offset.cmple(params.bounds_size + Vec3::splat(1e-4)).all());
            // Yaw only: heading stays in the horizontal plane
            assert!(agent.forward().y.abs() < 1e-5);
        }
    }

    #[test]
    fn same_seed_reproduces_the_flock() {
        let mut first = FlockStore::new();
        let mut second = FlockStore::new();
        let a = first.add_group(BehaviorParameters::default()).unwrap();
        let b = second.add_group(BehaviorParameters::default()).unwrap();

        Spawner::new(7).spawn_group(&mut first, a, 32).unwrap();
        Spawner::new(7).spawn_group(&mut second, b, 32).unwrap();

        let left: Vec<_> = first.agents(a).iter().map(|x| (x.position, x.orientation)).collect();
        let right: Vec<_> = second.agents(b).iter().map(|x| (x.position, x.orientation)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn respawn_replaces_agents() {
        let mut store = FlockStore::new();
        let group = store.add_group(BehaviorParameters::default()).unwrap();
        let mut spawner = Spawner::default();

        spawner.spawn_group(&mut store, group, 10).unwrap();
        spawner.respawn_group(&mut store, group, 4).unwrap();
        assert_eq!(store.agents(group).len(), 4);
    }

    #[test]
    fn unknown_group_is_an_error() {
        let mut store = FlockStore::new();
        let result = Spawner::default().spawn_group(&mut store, GroupId(3), 1);
        assert_eq!(result, Err(ConfigError::UnknownGroup(GroupId(3))));
    }
}

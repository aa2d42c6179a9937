/*
 * Spatial Grid Module
 *
 * This module defines the SpatialPartition used for neighbour lookups. Space is
 * divided into cubic cells keyed by an integer 3D index; each cell holds the
 * snapshots of the agents inside it. The partition is rebuilt every tick.
 *
 * Optimized for performance by:
 * - Computing cell keys and snapshots in parallel (scatter), then bucketing
 *   them in a single gather pass so no two workers ever write the same bucket
 * - Keeping the map, the scatter buffer and emptied bucket vectors alive
 *   between ticks so a steady-state tick does not allocate
 */

use std::collections::HashMap;

use glam::{IVec3, Vec3};
use rayon::prelude::*;

use crate::agent::{Agent, AgentSnapshot};
use crate::error::ConfigError;

/// Integer cell key: `floor(position / cell_size)` per component.
#[inline]
pub fn cell_index(position: Vec3, cell_size: f32) -> IVec3 {
    (position / cell_size).floor().as_ivec3()
}

/// Checkerboard parity of a cell, used to tint agents by partition.
#[inline]
pub fn cell_parity(cell: IVec3) -> bool {
    let odd = (cell.x & 1) ^ (cell.y & 1) ^ (cell.z & 1);
    odd == 0
}

#[derive(Debug, Default)]
pub struct SpatialPartition {
    cell_size: f32,
    buckets: HashMap<IVec3, Vec<AgentSnapshot>>,
    // Scatter output, reused across ticks
    keyed: Vec<(IVec3, AgentSnapshot)>,
    // Emptied bucket vectors waiting to be handed out again
    spare: Vec<Vec<AgentSnapshot>>,
    len: usize,
}

impl SpatialPartition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the partition from `agents`. The previous contents are discarded but
    /// their storage is kept.
    pub fn build(&mut self, agents: &[Agent], cell_size: f32) -> Result<(), ConfigError> {
        if cell_size.is_nan() || cell_size <= 0.0 {
            return Err(ConfigError::NonPositiveCellSize(cell_size));
        }

        self.clear();
        self.cell_size = cell_size;
        self.keyed.reserve(agents.len());
        self.buckets.reserve(agents.len());

        // Scatter: key every agent in parallel
        self.keyed.par_extend(agents.par_iter().map(|agent| {
            let snapshot = agent.snapshot();
            (cell_index(snapshot.position, cell_size), snapshot)
        }));

        // Gather: bucket sequentially, recycling vectors from earlier ticks
        let spare = &mut self.spare;
        for (cell, snapshot) in self.keyed.drain(..) {
            self.buckets
                .entry(cell)
                .or_insert_with(|| spare.pop().unwrap_or_default())
                .push(snapshot);
        }
        self.len = agents.len();

        Ok(())
    }

    /// Empty every bucket while retaining allocated capacity for the next tick.
    pub fn clear(&mut self) {
        for (_, mut bucket) in self.buckets.drain() {
            bucket.clear();
            self.spare.push(bucket);
        }
        self.keyed.clear();
        self.len = 0;
    }

    /// Snapshots stored in `cell`; empty when the cell holds no agents.
    #[inline]
    pub fn bucket(&self, cell: IVec3) -> &[AgentSnapshot] {
        self.buckets.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The bucket containing `position`.
    #[inline]
    pub fn bucket_at(&self, position: Vec3) -> &[AgentSnapshot] {
        self.bucket(cell_index(position, self.cell_size))
    }

    pub fn cells(&self) -> impl Iterator<Item = (IVec3, &[AgentSnapshot])> {
        self.buckets.iter().map(|(cell, bucket)| (*cell, bucket.as_slice()))
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }

    pub fn largest_bucket(&self) -> usize {
        self.buckets.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of snapshots the partition can take before the scatter buffer grows.
    pub fn capacity(&self) -> usize {
        self.keyed.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use glam::Quat;

    fn agent(id: u64, x: f32, y: f32, z: f32) -> Agent {
        Agent::new(AgentId(id), Vec3::new(x, y, z), Quat::IDENTITY)
    }

    #[test]
    fn cell_index_floors_each_component() {
        assert_eq!(cell_index(Vec3::new(0.5, 9.99, 10.0), 10.0), IVec3::new(0, 0, 1));
        assert_eq!(cell_index(Vec3::new(-0.1, -10.0, -10.1), 10.0), IVec3::new(-1, -1, -2));
    }

    #[test]
    fn positions_in_the_same_cell_share_an_index() {
        let a = cell_index(Vec3::new(1.0, 2.0, 3.0), 5.0);
        let b = cell_index(Vec3::new(4.9, 0.1, 4.0), 5.0);
        assert_eq!(a, b);
        assert_eq!(a, cell_index(Vec3::new(1.0, 2.0, 3.0), 5.0));
    }

    #[test]
    fn parity_alternates_between_adjacent_cells() {
        let origin = IVec3::ZERO;
        assert!(cell_parity(origin));
        assert!(!cell_parity(IVec3::X));
        assert!(!cell_parity(-IVec3::Z));
        assert!(cell_parity(IVec3::new(1, 1, 0)));
        assert!(!cell_parity(IVec3::new(-1, -1, -1)));
    }

    #[test]
    fn build_buckets_every_agent() {
        let agents = vec![
            agent(1, 0.0, 0.0, 0.0),
            agent(2, 1.0, 0.0, 0.0),
            agent(3, 15.0, 0.0, 0.0),
            agent(4, -3.0, 0.0, 0.0),
        ];
        let mut partition = SpatialPartition::new();
        partition.build(&agents, 10.0).unwrap();

        assert_eq!(partition.len(), 4);
        assert_eq!(partition.occupied_cells(), 3);
        assert_eq!(partition.bucket(IVec3::ZERO).len(), 2);
        assert_eq!(partition.bucket(IVec3::X).len(), 1);
        assert_eq!(partition.bucket(-IVec3::X).len(), 1);
        assert!(partition.bucket(IVec3::Y).is_empty());
        assert_eq!(partition.largest_bucket(), 2);
    }

    #[test]
    fn build_rejects_non_positive_cell_size() {
        let mut partition = SpatialPartition::new();
        let agents = vec![agent(1, 0.0, 0.0, 0.0)];
        assert_eq!(
            partition.build(&agents, 0.0),
            Err(ConfigError::NonPositiveCellSize(0.0))
        );
        assert!(partition.build(&agents, f32::NAN).is_err());
    }

    #[test]
    fn clear_keeps_capacity() {
        let agents: Vec<Agent> = (0..64).map(|i| agent(i, i as f32, 0.0, 0.0)).collect();
        let mut partition = SpatialPartition::new();
        partition.build(&agents, 4.0).unwrap();
        let capacity = partition.capacity();

        partition.clear();
        assert!(partition.is_empty());
        assert_eq!(partition.occupied_cells(), 0);
        assert!(partition.capacity() >= capacity);

        partition.build(&agents[..10], 4.0).unwrap();
        assert!(partition.capacity() >= capacity);
        assert_eq!(partition.len(), 10);
    }
}

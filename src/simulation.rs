/*
 * Simulation Module
 *
 * This module drives one tick of the flock. For every agent group it:
 * 1. Builds the group's spatial partition from the agents' current state
 * 2. Evaluates the flocking rules for every agent against that partition
 * 3. Commits the resulting movement and orientation back to the store
 * 4. Resets the partition, keeping its storage for the next tick
 *
 * Evaluation for a group only starts once its partition is complete, and no
 * agent is moved before every evaluation of its group has finished, so results
 * do not depend on update order.
 */

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::agent::Steering;
use crate::debug::TickStats;
use crate::error::ConfigError;
use crate::flocking;
use crate::spatial_grid::SpatialPartition;
use crate::store::{AgentStore, GroupId};

/// Phase of the per-group state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    Idle,
    BuildPartition,
    Barrier,
    Evaluate,
    Commit,
}

#[derive(Debug, Default)]
pub struct Simulation {
    // One reusable partition per group
    partitions: HashMap<GroupId, SpatialPartition>,
    steering: Vec<Steering>,
    phase: Option<(GroupId, TickPhase)>,
    ticks: u64,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every group of `store` by `delta_time` seconds.
    ///
    /// All groups' parameters are validated before anything moves; a bad group
    /// fails the whole tick and leaves the store untouched.
    pub fn tick<S: AgentStore>(&mut self, store: &mut S, delta_time: f32) -> Result<TickStats, ConfigError> {
        let started = Instant::now();
        let groups = store.group_ids();

        for &group in &groups {
            store
                .parameters(group)
                .ok_or(ConfigError::UnknownGroup(group))?
                .validate()?;
        }

        let mut stats = TickStats::default();
        for &group in &groups {
            self.tick_group(store, group, delta_time, &mut stats)?;
        }

        self.ticks += 1;
        stats.elapsed = started.elapsed();
        debug!(
            tick = self.ticks,
            groups = stats.groups,
            agents = stats.agents,
            cells = stats.occupied_cells,
            largest_bucket = stats.largest_bucket,
            elapsed_us = stats.elapsed.as_micros() as u64,
            "tick complete"
        );
        Ok(stats)
    }

    fn tick_group<S: AgentStore>(
        &mut self,
        store: &mut S,
        group: GroupId,
        delta_time: f32,
        stats: &mut TickStats,
    ) -> Result<(), ConfigError> {
        let params = store
            .parameters(group)
            .cloned()
            .ok_or(ConfigError::UnknownGroup(group))?;
        let agents = store.agents(group);
        if agents.is_empty() {
            return Ok(());
        }

        let partition = self.partitions.entry(group).or_default();

        enter(&mut self.phase, group, TickPhase::BuildPartition);
        partition.build(agents, params.partition_cell_size)?;

        // `build` has returned: the partition is complete and read-only from here on
        enter(&mut self.phase, group, TickPhase::Barrier);

        enter(&mut self.phase, group, TickPhase::Evaluate);
        let partition_ref: &SpatialPartition = partition;
        self.steering.clear();
        self.steering.par_extend(
            agents
                .par_iter()
                .map(|agent| flocking::evaluate(partition_ref, agent, &params)),
        );

        stats.groups += 1;
        stats.agents += agents.len();
        stats.occupied_cells += partition.occupied_cells();
        stats.largest_bucket = stats.largest_bucket.max(partition.largest_bucket());

        enter(&mut self.phase, group, TickPhase::Commit);
        let rotation_factor = params.rotation_factor(delta_time);
        let steering = &self.steering;
        store
            .agents_mut(group)
            .par_iter_mut()
            .zip(steering.par_iter())
            .for_each(|(agent, steer)| agent.integrate(steer, delta_time, rotation_factor));

        partition.clear();
        enter(&mut self.phase, group, TickPhase::Idle);
        Ok(())
    }

    /// Phase of the group most recently worked on; `Idle` between ticks.
    pub fn phase(&self) -> TickPhase {
        self.phase.map_or(TickPhase::Idle, |(_, phase)| phase)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reusable partition of `group`, if the group has been simulated before.
    pub fn partition(&self, group: GroupId) -> Option<&SpatialPartition> {
        self.partitions.get(&group)
    }

    /// Drop partitions of groups that no longer exist in `store`.
    pub fn retain_groups<S: AgentStore>(&mut self, store: &S) {
        let live = store.group_ids();
        self.partitions.retain(|group, _| live.contains(group));
    }
}

fn enter(phase: &mut Option<(GroupId, TickPhase)>, group: GroupId, next: TickPhase) {
    trace!(group = group.0, phase = ?next, "tick phase");
    *phase = Some((group, next));
}

/// Turns variable frame times into whole fixed-size simulation steps.
#[derive(Debug)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    max_steps: usize,
}

impl FixedTimestep {
    pub fn new(steps_per_second: f32, max_steps: usize) -> Self {
        Self {
            step: Duration::from_secs_f32(1.0 / steps_per_second.max(1.0)),
            accumulator: Duration::ZERO,
            max_steps: max_steps.max(1),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn set_rate(&mut self, steps_per_second: f32) {
        self.step = Duration::from_secs_f32(1.0 / steps_per_second.max(1.0));
    }

    /// Add elapsed frame time and return how many fixed steps are due.
    pub fn advance(&mut self, frame_time: Duration) -> usize {
        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        // Drop backlog we could not catch up on
        if self.accumulator >= self.step {
            warn!(
                backlog_ms = self.accumulator.as_secs_f64() * 1000.0,
                "simulation falling behind, dropping backlog"
            );
            self.accumulator = Duration::ZERO;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / self.step.as_secs_f32()).clamp(0.0, 1.0)
    }
}

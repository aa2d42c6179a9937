/*
 * Flocking Module
 *
 * This module evaluates the flocking rules for one agent against a fully built
 * spatial partition. Each evaluation only reads the partition and the agent's own
 * state, so any number of them can run in parallel for the same tick.
 *
 * Rules, blended into a single movement vector:
 * 1. Cohesion: steer towards the average position of nearby agents
 * 2. Avoidance: steer away from agents that are too close
 * 3. Alignment: steer towards the average heading of nearby agents
 * 4. Bounds: steer back towards the bounds center when straying too far
 *
 * Only the agent's own cell is scanned. Neighbours just across a cell border are
 * never seen, whatever the configured distances are, so the effective flocking
 * radius is bounded by the partition cell size.
 */

use glam::{Mat3, Quat, Vec3};

use crate::agent::{Agent, Steering};
use crate::params::BehaviorParameters;
use crate::spatial_grid::SpatialPartition;

// Fraction of `inside_bounds_distance` beyond which the recenter force kicks in
pub const BOUNDS_RECENTER_THRESHOLD: f32 = 0.9;

/// Normalize, mapping zero-length (or non-finite) input to the zero vector.
#[inline]
pub fn normalize_safe(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Rotation whose +Z axis points along `direction` and whose +Y axis is as close
/// to `up` as possible. Degenerate directions yield the identity rotation.
pub fn look_rotation_safe(direction: Vec3, up: Vec3) -> Quat {
    let forward = direction.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let right = up.cross(forward).normalize_or_zero();
    if right == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let new_up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, new_up, forward)).normalize()
}

#[derive(Default)]
struct Accumulator {
    cohesion: Vec3,
    cohesion_count: u32,
    avoidance: Vec3,
    avoidance_count: u32,
    alignment: Vec3,
    alignment_count: u32,
}

/// Compute the desired movement and heading of `agent` for this tick.
///
/// `partition` must have been built with `params.partition_cell_size`; the agent's
/// own cell is looked up with the partition's size.
pub fn evaluate(partition: &SpatialPartition, agent: &Agent, params: &BehaviorParameters) -> Steering {
    debug_assert_eq!(
        partition.cell_size(),
        params.partition_cell_size,
        "partition built with a different cell size"
    );
    let position = agent.position;
    let forward = agent.forward();

    // Alignment starts from the agent's own heading
    let mut acc = Accumulator {
        alignment: forward,
        ..Default::default()
    };

    for other in partition.bucket_at(position) {
        if other.id == agent.id {
            continue;
        }

        let distance = position.distance(other.position);

        if distance < params.cohesion_distance {
            acc.cohesion += other.position;
            acc.cohesion_count += 1;
        }
        if distance < params.avoidance_distance {
            acc.avoidance += position - other.position;
            acc.avoidance_count += 1;
        }
        if distance < params.alignment_distance {
            acc.alignment += other.forward;
            acc.alignment_count += 1;
        }
    }

    let cohesion = if acc.cohesion_count > 0 {
        let center = acc.cohesion / acc.cohesion_count as f32;
        normalize_safe(center - position) * params.cohesion_weight
    } else {
        Vec3::ZERO
    };

    let avoidance = if acc.avoidance_count > 0 {
        normalize_safe(acc.avoidance / acc.avoidance_count as f32) * params.avoidance_weight
    } else {
        Vec3::ZERO
    };

    // With no neighbours the unweighted own heading is kept as is
    let alignment = if acc.alignment_count > 0 {
        normalize_safe(acc.alignment / acc.alignment_count as f32) * params.alignment_weight
    } else {
        acc.alignment
    };

    let to_center = params.bounds_center - position;
    let recenter = if to_center.length() / params.inside_bounds_distance > BOUNDS_RECENTER_THRESHOLD {
        normalize_safe(to_center) * params.inside_bounds_weight
    } else {
        Vec3::ZERO
    };

    let mut movement = clamp_speed(
        cohesion + avoidance + alignment + recenter,
        params.min_speed,
        params.max_speed,
    );

    // A net force of exactly zero drifts along the current heading, unscaled
    if movement == Vec3::ZERO {
        movement = forward;
    }

    Steering {
        movement,
        heading: look_rotation_safe(movement, agent.up()),
    }
}

// Zero stays zero: normalize_safe(0) * min_speed == 0.
// With min_speed > max_speed the min branch wins.
#[inline]
fn clamp_speed(movement: Vec3, min_speed: f32, max_speed: f32) -> Vec3 {
    let speed = movement.length();
    if speed < min_speed {
        normalize_safe(movement) * min_speed
    } else if speed > max_speed {
        normalize_safe(movement) * max_speed
    } else {
        movement
    }
}

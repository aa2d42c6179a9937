/*
 * Behaviour Parameters Module
 *
 * This module defines the BehaviorParameters struct shared by every agent of a
 * group. The same values drive the flocking evaluator, the spawner (bounds) and
 * the viewer sliders. It also provides validation and change detection so edited
 * values are only pushed to the simulation when they actually changed.
 */

use glam::Vec3;

use crate::error::ConfigError;

/// How the per-tick orientation blend factor is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationBlend {
    /// `t = delta_time * rotation_speed`
    #[default]
    RotationSpeed,
    /// `t = delta_time`, ignoring `rotation_speed` entirely.
    DeltaTimeOnly,
}

// Parameters shared by all agents of one group
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorParameters {
    pub min_speed: f32,
    pub max_speed: f32,
    pub rotation_speed: f32,
    pub rotation_blend: RotationBlend,

    pub bounds_center: Vec3,
    pub bounds_size: Vec3,
    pub inside_bounds_distance: f32,
    pub inside_bounds_weight: f32,

    pub cohesion_distance: f32,
    pub cohesion_weight: f32,
    pub avoidance_distance: f32,
    pub avoidance_weight: f32,
    pub alignment_distance: f32,
    pub alignment_weight: f32,

    // Edge length of one spatial partition cell; neighbours are only searched inside one cell
    pub partition_cell_size: f32,
}

impl Default for BehaviorParameters {
    fn default() -> Self {
        Self {
            min_speed: 2.0,
            max_speed: 6.0,
            rotation_speed: 4.0,
            rotation_blend: RotationBlend::RotationSpeed,
            bounds_center: Vec3::ZERO,
            bounds_size: Vec3::new(40.0, 10.0, 40.0),
            inside_bounds_distance: 40.0,
            inside_bounds_weight: 3.0,
            cohesion_distance: 6.0,
            cohesion_weight: 1.0,
            avoidance_distance: 2.0,
            avoidance_weight: 1.5,
            alignment_distance: 5.0,
            alignment_weight: 1.0,
            partition_cell_size: 10.0,
        }
    }
}

impl BehaviorParameters {
    /// Reject parameter sets that would make the spatial hash or the speed clamp ill-defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.partition_cell_size.is_finite() {
            return Err(ConfigError::NotFinite { field: "partition_cell_size" });
        }
        if self.partition_cell_size <= 0.0 {
            return Err(ConfigError::NonPositiveCellSize(self.partition_cell_size));
        }

        if !self.bounds_center.is_finite() {
            return Err(ConfigError::NotFinite { field: "bounds_center" });
        }
        if !self.bounds_size.is_finite() {
            return Err(ConfigError::NotFinite { field: "bounds_size" });
        }
        if self.bounds_size.min_element() < 0.0 {
            return Err(ConfigError::Negative {
                field: "bounds_size",
                value: self.bounds_size.min_element(),
            });
        }

        let scalars = [
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("rotation_speed", self.rotation_speed),
            ("inside_bounds_distance", self.inside_bounds_distance),
            ("inside_bounds_weight", self.inside_bounds_weight),
            ("cohesion_distance", self.cohesion_distance),
            ("cohesion_weight", self.cohesion_weight),
            ("avoidance_distance", self.avoidance_distance),
            ("avoidance_weight", self.avoidance_weight),
            ("alignment_distance", self.alignment_distance),
            ("alignment_weight", self.alignment_weight),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        Ok(())
    }

    /// Orientation blend factor for one tick.
    ///
    /// The factor is clamped to `[0, 1]`, so a large `delta_time * rotation_speed`
    /// snaps to the target heading. An unclamped slerp would extrapolate past it
    /// instead; that overshoot is deliberately not reproduced.
    pub fn rotation_factor(&self, delta_time: f32) -> f32 {
        let t = match self.rotation_blend {
            RotationBlend::RotationSpeed => delta_time * self.rotation_speed,
            RotationBlend::DeltaTimeOnly => delta_time,
        };
        t.clamp(0.0, 1.0)
    }

    // Get parameter ranges for UI sliders
    pub fn speed_range() -> std::ops::RangeInclusive<f32> {
        0.0..=10.0
    }

    pub fn distance_range() -> std::ops::RangeInclusive<f32> {
        0.0..=10.0
    }

    pub fn weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=10.0
    }

    pub fn bounds_distance_range() -> std::ops::RangeInclusive<f32> {
        1.0..=200.0
    }

    pub fn cell_size_range() -> std::ops::RangeInclusive<f32> {
        1.0..=100.0
    }
}

/// Remembers a parameter set so edits made between frames can be detected.
#[derive(Debug, Default)]
pub struct ParamSnapshot {
    previous: Option<BehaviorParameters>,
}

impl ParamSnapshot {
    pub fn take(&mut self, params: &BehaviorParameters) {
        self.previous = Some(params.clone());
    }

    // Nothing has changed until a snapshot exists
    pub fn changed(&self, params: &BehaviorParameters) -> bool {
        match &self.previous {
            Some(prev) => prev != params,
            None => false,
        }
    }
}

/*
 * Agent Module
 *
 * This module defines the motion state of a single agent and the read-only
 * snapshot the spatial partition stores for it. Agents are owned by the agent
 * store; the simulation only reads position/heading at the start of a tick and
 * writes position/orientation back at the end of it.
 */

use glam::{Quat, Vec3};

/// Identity of an agent inside its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub position: Vec3,
    pub orientation: Quat,
}

impl Agent {
    pub fn new(id: AgentId, position: Vec3, orientation: Quat) -> Self {
        Self {
            id,
            position,
            orientation,
        }
    }

    // Local +Z is the heading
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Capture the immutable per-tick copy used for neighbour queries.
    #[inline]
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            position: self.position,
            forward: self.forward(),
        }
    }

    /// Commit one tick of movement: translate by `movement * delta_time` and turn
    /// towards the desired heading by `rotation_factor`.
    pub fn integrate(&mut self, steering: &Steering, delta_time: f32, rotation_factor: f32) {
        self.position += steering.movement * delta_time;
        self.orientation = self
            .orientation
            .slerp(steering.heading, rotation_factor)
            .normalize();
    }
}

/// Read-only copy of an agent's motion state, captured when the partition is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Vec3,
    pub forward: Vec3,
}

/// Result of evaluating the flocking rules for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub movement: Vec3,
    pub heading: Quat,
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            movement: Vec3::ZERO,
            heading: Quat::IDENTITY,
        }
    }
}

/*
 * Debug Information Module
 *
 * Per-tick diagnostics reported by the simulation driver and shown by the
 * viewer: how many groups and agents were moved, how the partition was
 * populated and how long the tick took.
 */

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickStats {
    pub groups: usize,
    pub agents: usize,
    pub occupied_cells: usize,
    pub largest_bucket: usize,
    pub elapsed: Duration,
}

impl TickStats {
    pub fn mean_bucket(&self) -> f32 {
        if self.occupied_cells == 0 {
            0.0
        } else {
            self.agents as f32 / self.occupied_cells as f32
        }
    }
}

// Debug information to display
#[derive(Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub ticks_per_frame: usize,
    pub last_tick: TickStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_bucket_handles_empty_partition() {
        assert_eq!(TickStats::default().mean_bucket(), 0.0);

        let stats = TickStats {
            agents: 12,
            occupied_cells: 4,
            ..Default::default()
        };
        assert_eq!(stats.mean_bucket(), 3.0);
    }
}

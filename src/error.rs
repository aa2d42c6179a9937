/*
 * Error Module
 *
 * Configuration faults that make a tick impossible to run. Numeric degeneracies
 * (zero-length vectors, degenerate look directions) are not errors and never
 * show up here; they resolve to fallback values inside the evaluator.
 */

use thiserror::Error;

use crate::store::GroupId;

/// Errors raised when behaviour parameters or group lookups are unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The partition cell size defines the spatial hash and must be strictly positive.
    #[error("partition cell size must be positive, got {0}")]
    NonPositiveCellSize(f32),

    #[error("parameter `{field}` must be finite")]
    NotFinite { field: &'static str },

    #[error("parameter `{field}` must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("unknown agent group {0:?}")]
    UnknownGroup(GroupId),
}

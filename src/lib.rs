/*
 * 3D Boid Flocking Simulation - Module Definitions
 *
 * The library holds the simulation kernel: a per-tick spatial partition, the
 * flocking force evaluator and the driver that commits results back to an
 * agent store. The interactive viewer lives in the binary.
 */

// Re-export key components for easier access
pub use agent::{Agent, AgentId, AgentSnapshot, Steering};
pub use debug::{DebugInfo, TickStats};
pub use error::ConfigError;
pub use params::{BehaviorParameters, ParamSnapshot, RotationBlend};
pub use simulation::{FixedTimestep, Simulation, TickPhase};
pub use spatial_grid::{cell_index, cell_parity, SpatialPartition};
pub use spawner::Spawner;
pub use store::{AgentStore, FlockStore, GroupId};

// Define modules
pub mod agent;
pub mod debug;
pub mod error;
pub mod flocking;
pub mod params;
pub mod simulation;
pub mod spatial_grid;
pub mod spawner;
pub mod store;

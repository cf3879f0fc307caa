pub mod math;
pub mod core;
pub mod bodies;
pub mod collision;
pub mod forces;

/// Re-export common types for easier usage
pub use crate::core::{Simulation, SimulationConfig, Preset, Peer, StepOutcome};
pub use crate::bodies::{Body, BodyFlags, BodyId, Obstacle, Placement};
pub use crate::forces::Attractor;
pub use crate::math::Vector3;

/// Error types for the physics engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Simulation stability error: {0}")]
        SimulationError(String),
    }
}

/// Result type for physics engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

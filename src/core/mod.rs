pub mod world;
pub mod config;
pub mod events;
mod clock;
mod step;

pub use self::world::{Simulation, StepReport};
pub use self::config::{AttractorSource, Preset, SimulationConfig};
pub use self::events::{CollisionEvent, CollisionSink, EventQueue};
pub use self::clock::FrameClock;
pub use self::step::{Peer, StepOutcome};

mod body;
mod obstacle;

pub use self::body::{Body, BodyState, Placement};
pub use self::body_flags::BodyFlags;
pub use self::obstacle::Obstacle;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

static NEXT_BODY_ID: AtomicU32 = AtomicU32::new(1);

/// A process-unique identifier for a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyId(u32);

impl BodyId {
    /// Allocates the next unused id
    pub(crate) fn next() -> Self {
        Self(NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of bodies
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        pub struct BodyFlags: u32 {
            /// Body never moves; collisions push only the other body
            const STATIC = 0x01;

            /// Body pulls others toward itself when attractors are flagged
            const ATTRACTOR = 0x02;
        }
    }
}

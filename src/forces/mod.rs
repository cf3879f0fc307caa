mod gravity;

pub use self::gravity::{Attractor, GravityModel};

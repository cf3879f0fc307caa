use crate::bodies::body::validate_radius;
use crate::error::PhysicsError;
use crate::math::Vector3;
use crate::Result;

/// An immovable sphere that bodies collide against.
///
/// Obstacles carry no velocity and no collision sink; collision correction
/// and impulses are applied to the body side only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    position: Vector3,
    radius: f32,
}

impl Obstacle {
    /// Default obstacle radius
    pub const DEFAULT_RADIUS: f32 = 1.0;

    /// Creates an obstacle with the default radius
    pub fn new(position: Vector3) -> Result<Self> {
        Self::with_radius(position, Self::DEFAULT_RADIUS)
    }

    /// Creates an obstacle with the given radius
    pub fn with_radius(position: Vector3, radius: f32) -> Result<Self> {
        if !position.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "obstacle position must be finite, got {position}"
            )));
        }
        validate_radius(radius)?;

        Ok(Self { position, radius })
    }

    /// Returns the obstacle's position
    pub fn get_position(&self) -> Vector3 {
        self.position
    }

    /// Moves the obstacle
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Returns the obstacle's radius
    pub fn get_radius(&self) -> f32 {
        self.radius
    }
}

use crate::bodies::{BodyFlags, BodyId};
use crate::core::CollisionSink;
use crate::error::PhysicsError;
use crate::math::Vector3;
use crate::Result;

use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Initial placement copied from an external placeholder object
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// The world-space position to start from
    pub position: Vector3,
}

impl Placement {
    /// Creates a placement at the given position
    pub fn at(position: Vector3) -> Self {
        Self { position }
    }
}

impl From<Vector3> for Placement {
    fn from(position: Vector3) -> Self {
        Self::at(position)
    }
}

/// A spherical body driven by the simulation step
pub struct Body {
    pub(crate) id: BodyId,

    /// World-space location of the sphere centre
    pub(crate) position: Vector3,

    /// Velocity accumulated from gravity and collision impulses
    pub(crate) velocity: Vector3,

    /// Collision sphere radius
    pub(crate) radius: f32,

    pub(crate) flags: BodyFlags,

    /// Multiplier applied to the pull this body exerts as an attractor
    pub(crate) gravity_weight: f32,

    /// Notified when another body collides into this one
    pub(crate) sink: Option<Box<dyn CollisionSink>>,
}

/// A copy of every piece of physics state a body carries
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyState {
    pub id: BodyId,
    pub position: Vector3,
    pub velocity: Vector3,
    pub radius: f32,
    pub flags: BodyFlags,
    pub gravity_weight: f32,
}

impl Body {
    /// Default collision radius
    pub const DEFAULT_RADIUS: f32 = 1.0;

    /// Creates a movable body at the placement with the given radius
    pub fn new(placement: impl Into<Placement>, radius: f32) -> Result<Self> {
        let placement = placement.into();

        if !placement.position.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "body position must be finite, got {}",
                placement.position
            )));
        }
        validate_radius(radius)?;

        Ok(Self {
            id: BodyId::next(),
            position: placement.position,
            velocity: Vector3::zero(),
            radius,
            flags: BodyFlags::empty(),
            gravity_weight: 1.0,
            sink: None,
        })
    }

    /// Creates a movable body with the default radius
    pub fn new_unit(placement: impl Into<Placement>) -> Result<Self> {
        Self::new(placement, Self::DEFAULT_RADIUS)
    }

    /// Creates a static body that never moves
    pub fn new_static(placement: impl Into<Placement>, radius: f32) -> Result<Self> {
        Ok(Self::new(placement, radius)?.with_flags(BodyFlags::STATIC))
    }

    /// Creates a static body that also acts as an attractor
    pub fn new_attractor(placement: impl Into<Placement>, radius: f32) -> Result<Self> {
        Ok(Self::new(placement, radius)?.with_flags(BodyFlags::STATIC | BodyFlags::ATTRACTOR))
    }

    /// Adds the given flags
    pub fn with_flags(mut self, flags: BodyFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    /// Sets the weight of the pull this body exerts on others
    pub fn with_gravity_weight(mut self, weight: f32) -> Self {
        self.gravity_weight = weight;
        self
    }

    /// Attaches a collision sink
    pub fn with_sink(mut self, sink: impl CollisionSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Returns the body's identity
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector3 {
        self.position
    }

    /// Moves the body directly, e.g. when an input controller drags it
    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    /// Returns the body's velocity
    pub fn get_velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Sets the body's velocity
    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// Returns the collision radius
    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    /// Returns the body's flags
    pub fn get_flags(&self) -> BodyFlags {
        self.flags
    }

    /// Returns whether the body is static
    pub fn is_static(&self) -> bool {
        self.flags.contains(BodyFlags::STATIC)
    }

    /// Sets whether the body is static
    pub fn set_static(&mut self, is_static: bool) {
        self.flags.set(BodyFlags::STATIC, is_static);
    }

    /// Returns whether the body acts as an attractor
    pub fn is_attractor(&self) -> bool {
        self.flags.contains(BodyFlags::ATTRACTOR)
    }

    /// Sets whether the body acts as an attractor
    pub fn set_attractor(&mut self, is_attractor: bool) {
        self.flags.set(BodyFlags::ATTRACTOR, is_attractor);
    }

    /// Returns the attractor gravity weight
    pub fn get_gravity_weight(&self) -> f32 {
        self.gravity_weight
    }

    /// Sets the attractor gravity weight
    pub fn set_gravity_weight(&mut self, weight: f32) {
        self.gravity_weight = weight;
    }

    /// Replaces the collision sink, returning the previous one
    pub fn set_sink(&mut self, sink: Option<Box<dyn CollisionSink>>) -> Option<Box<dyn CollisionSink>> {
        std::mem::replace(&mut self.sink, sink)
    }

    /// Returns whether a collision sink is attached
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Returns true if position and velocity hold no NaN or infinity
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Snapshots the body's physics state
    pub fn state(&self) -> BodyState {
        BodyState {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            radius: self.radius,
            flags: self.flags,
            gravity_weight: self.gravity_weight,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("radius", &self.radius)
            .field("flags", &self.flags)
            .field("gravity_weight", &self.gravity_weight)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

pub(crate) fn validate_radius(radius: f32) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidParameter(format!(
            "radius must be positive and finite, got {radius}"
        )))
    }
}

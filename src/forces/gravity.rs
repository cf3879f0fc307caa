use crate::bodies::{Body, BodyId};
use crate::math::Vector3;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Parameters of the bounded-offset attraction field.
///
/// A body is pulled towards the point `max_distance` away from the source
/// along the line joining them, so the pull shrinks as the body reaches that
/// offset instead of growing without bound near the source.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct GravityModel {
    /// Per-axis ceiling of the pull strength
    pub max_distance: Vector3,

    /// Upper bound on the pull length, if any
    pub pull_clamp: Option<f32>,
}

impl GravityModel {
    /// Computes the pull a body at `position` feels from a source at `source`
    pub fn pull(&self, position: Vector3, source: Vector3) -> Vector3 {
        let current_offset = source - position;
        let direction = current_offset.normalize();
        let bounded_offset = direction.component_mul(&self.max_distance);
        let pull = bounded_offset - current_offset;

        match self.pull_clamp {
            Some(limit) => pull.clamp_length(-limit, limit),
            None => pull,
        }
    }
}

impl Default for GravityModel {
    fn default() -> Self {
        Self {
            max_distance: Vector3::splat(200.0),
            pull_clamp: None,
        }
    }
}

/// A source of attraction.
///
/// Attractors are snapshots: taking one from a body copies its position and
/// weight. Fixed attractors have no identity and never skip anyone.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Attractor {
    /// The body this attractor was taken from, if any
    pub id: Option<BodyId>,

    /// Position of the source
    pub position: Vector3,

    /// Multiplier on the pull this source exerts
    pub gravity_weight: f32,
}

impl Attractor {
    /// Creates a fixed attractor point with weight 1
    pub fn fixed(position: Vector3) -> Self {
        Self {
            id: None,
            position,
            gravity_weight: 1.0,
        }
    }

    /// Sets the gravity weight
    pub fn with_gravity_weight(mut self, weight: f32) -> Self {
        self.gravity_weight = weight;
        self
    }
}

impl From<&Body> for Attractor {
    fn from(body: &Body) -> Self {
        Self {
            id: Some(body.id()),
            position: body.get_position(),
            gravity_weight: body.get_gravity_weight(),
        }
    }
}

impl Body {
    /// Accumulates the pull of `source` into the body's velocity.
    ///
    /// `delta` is the already scaled time step. Returns false when the source
    /// is the body itself.
    pub fn attract(&mut self, source: &Attractor, delta: f32, model: &GravityModel) -> bool {
        if source.id == Some(self.id) {
            return false;
        }

        self.velocity += model.pull(self.position, source.position) * delta;
        true
    }
}

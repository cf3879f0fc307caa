use crate::bodies::{Body, BodyId, Obstacle};
use crate::core::CollisionEvent;
use crate::math::{Vector3, EPSILON};

use tracing::{trace, warn};

/// A resolved overlap between a body and one of its peers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The peer body, or `None` when the peer was an obstacle
    pub other: Option<BodyId>,

    /// Unit normal pointing from the peer towards the resolving body
    pub normal: Vector3,

    /// Overlap depth before correction
    pub penetration: f32,
}

/// Overlap geometry shared by body and obstacle resolution
struct Overlap {
    correction: Vector3,
    normal: Vector3,
    penetration: f32,
}

/// Tests two spheres for overlap.
///
/// The correction is the unnormalized centre offset scaled by half the
/// (negative) gap, so it grows with both penetration and centre distance.
/// Coincident centres use `coincident_normal` as the offset.
fn overlap(
    position: Vector3,
    radius: f32,
    other_position: Vector3,
    other_radius: f32,
    coincident_normal: Vector3,
) -> Option<Overlap> {
    let mut offset = position - other_position;
    let distance = offset.length();
    let radius_sum = radius + other_radius;

    if distance >= radius_sum {
        return None;
    }

    if distance < EPSILON {
        warn!(%position, "coincident sphere centres, using fallback normal");
        offset = coincident_normal.normalize();
    }

    Some(Overlap {
        correction: offset * (0.5 * (distance - radius_sum)),
        normal: offset.normalize(),
        penetration: radius_sum - distance,
    })
}

impl Body {
    /// Removes the relative velocity along `normal`, returning the impulse
    /// the other side should receive
    fn exchange_impulse(&mut self, other_velocity: Vector3, normal: Vector3) -> Vector3 {
        let relative_velocity = self.velocity - other_velocity;
        let impulse = normal * relative_velocity.dot(&normal);
        self.velocity -= impulse;
        impulse
    }

    /// Resolves an overlap with another body.
    ///
    /// Both bodies are pushed apart by the same correction unless static,
    /// the normal component of their relative velocity is exchanged, and the
    /// other body's sink is told that `self` collided into it.
    pub fn resolve(&mut self, other: &mut Body, coincident_normal: Vector3) -> Option<Contact> {
        if other.id == self.id {
            return None;
        }

        let overlap = overlap(
            self.position,
            self.radius,
            other.position,
            other.radius,
            coincident_normal,
        )?;

        if !self.is_static() {
            self.position -= overlap.correction;
        }
        if !other.is_static() {
            other.position += overlap.correction;
        }

        let impulse = self.exchange_impulse(other.velocity, overlap.normal);
        other.velocity += impulse;

        trace!(body = %self.id, other = %other.id, penetration = overlap.penetration, "resolved overlap");

        if let Some(sink) = other.sink.as_mut() {
            sink.on_collision(&CollisionEvent {
                target: other.id,
                collider: self.id,
                collider_velocity: self.velocity,
                normal: overlap.normal,
                penetration: overlap.penetration,
            });
        }

        Some(Contact {
            other: Some(other.id),
            normal: overlap.normal,
            penetration: overlap.penetration,
        })
    }

    /// Resolves an overlap with an immovable obstacle
    pub fn resolve_obstacle(&mut self, obstacle: &Obstacle, coincident_normal: Vector3) -> Option<Contact> {
        let overlap = overlap(
            self.position,
            self.radius,
            obstacle.get_position(),
            obstacle.get_radius(),
            coincident_normal,
        )?;

        if !self.is_static() {
            self.position -= overlap.correction;
        }

        // Obstacles have no velocity to receive the impulse
        self.exchange_impulse(Vector3::zero(), overlap.normal);

        Some(Contact {
            other: None,
            normal: overlap.normal,
            penetration: overlap.penetration,
        })
    }
}

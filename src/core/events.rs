use crate::bodies::BodyId;
use crate::math::Vector3;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Collider speed at which [`CollisionEvent::intensity`] saturates
pub const IMPACT_SPEED_CEILING: f32 = 500.0;

/// Notification that one body ran into another.
///
/// The event is delivered to the body that was *hit* (`target`); `collider`
/// is the body whose step detected the overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The body that was collided into
    pub target: BodyId,

    /// The body that collided into `target`
    pub collider: BodyId,

    /// The collider's velocity after the impulse exchange
    pub collider_velocity: Vector3,

    /// Unit normal pointing from `target` towards `collider`
    pub normal: Vector3,

    /// How deep the two spheres overlapped before correction
    pub penetration: f32,
}

impl CollisionEvent {
    /// Returns the impact strength mapped into `[0, 1]`
    pub fn intensity(&self) -> f32 {
        self.collider_velocity.length().min(IMPACT_SPEED_CEILING) / IMPACT_SPEED_CEILING
    }
}

/// Receiver for collision notifications.
///
/// Sinks are called synchronously from inside collision resolution and only
/// ever see a copy of the event, never the bodies themselves.
pub trait CollisionSink: Send {
    /// Called once for every overlap resolved against the owning body
    fn on_collision(&mut self, event: &CollisionEvent);
}

impl<F> CollisionSink for F
where
    F: FnMut(&CollisionEvent) + Send,
{
    fn on_collision(&mut self, event: &CollisionEvent) {
        self(event)
    }
}

/// A shared queue of collision events.
///
/// Clones share the same buffer, so one queue can be attached to many bodies
/// and drained by the caller after a frame.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Arc<Mutex<VecDeque<CollisionEvent>>>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<CollisionEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a collision event to the queue
    pub fn push(&self, event: CollisionEvent) {
        self.lock().push_back(event);
    }

    /// Removes and returns every queued event in arrival order
    pub fn drain(&self) -> Vec<CollisionEvent> {
        self.lock().drain(..).collect()
    }

    /// Returns the number of queued events
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl CollisionSink for EventQueue {
    fn on_collision(&mut self, event: &CollisionEvent) {
        self.push(*event);
    }
}

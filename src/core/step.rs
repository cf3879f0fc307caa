use crate::bodies::{Body, Obstacle};
use crate::core::SimulationConfig;
use crate::forces::Attractor;

use tracing::debug;

/// Something a body can collide with during its step
#[derive(Debug)]
pub enum Peer<'a> {
    /// Another body; correction and impulses are applied to it too
    Body(&'a mut Body),

    /// An immovable obstacle
    Obstacle(&'a Obstacle),
}

impl<'a> From<&'a mut Body> for Peer<'a> {
    fn from(body: &'a mut Body) -> Self {
        Peer::Body(body)
    }
}

impl<'a> From<&'a Obstacle> for Peer<'a> {
    fn from(obstacle: &'a Obstacle) -> Self {
        Peer::Obstacle(obstacle)
    }
}

/// What a call to [`Body::update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The delta exceeded the frame-skip threshold; nothing changed
    Skipped,

    /// The step ran and resolved `contacts` overlaps
    Stepped { contacts: usize },
}

impl Body {
    /// Advances the body by `delta` seconds.
    ///
    /// Runs boundary confinement, collision against every peer, gravity from
    /// every attractor (or the fallback pull when there are none), the speed
    /// clamp and finally integration, in that order.
    pub fn update<'p, I>(
        &mut self,
        peers: I,
        attractors: &[Attractor],
        config: &SimulationConfig,
        delta: f32,
    ) -> StepOutcome
    where
        I: IntoIterator<Item = Peer<'p>>,
    {
        let Some(contacts) = self.collide(peers, config, delta) else {
            return StepOutcome::Skipped;
        };

        self.advance(attractors, config, delta);
        StepOutcome::Stepped { contacts }
    }

    /// First half of [`Body::update`]: the frame-skip guard, confinement and
    /// collision resolution.
    ///
    /// Returns the number of contacts, or `None` when the step is skipped, in
    /// which case [`Body::advance`] must not run either.
    pub(crate) fn collide<'p, I>(&mut self, peers: I, config: &SimulationConfig, delta: f32) -> Option<usize>
    where
        I: IntoIterator<Item = Peer<'p>>,
    {
        if delta > config.frame_skip_threshold {
            debug!(body = %self.id, delta, "frame stalled, skipping step");
            return None;
        }

        debug_assert!(self.is_finite(), "body {} has non-finite state", self.id);

        if let Some(half_extent) = config.half_extent() {
            self.confine(half_extent, config.boundary_damping);
        }

        let mut contacts = 0;
        for peer in peers {
            let contact = match peer {
                Peer::Body(other) => self.resolve(other, config.coincident_normal),
                Peer::Obstacle(obstacle) => self.resolve_obstacle(obstacle, config.coincident_normal),
            };
            if contact.is_some() {
                contacts += 1;
            }
        }

        Some(contacts)
    }

    /// Second half of [`Body::update`]: gravity, the speed clamp and
    /// integration
    pub(crate) fn advance(&mut self, attractors: &[Attractor], config: &SimulationConfig, delta: f32) {
        let scene_delta = delta * config.gravity_scale;
        if attractors.is_empty() {
            self.velocity += config.fallback_gravity * scene_delta;
        } else {
            for attractor in attractors {
                self.attract(attractor, scene_delta * attractor.gravity_weight, &config.gravity);
            }
        }

        if let Some(limit) = config.speed_limit {
            self.velocity = self.velocity.clamp_length(-limit, limit);
        }

        if !self.is_static() {
            self.position += self.velocity * (delta * config.integration_scale);
        }
    }
}

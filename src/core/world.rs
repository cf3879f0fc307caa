use crate::bodies::{Body, BodyId, Obstacle};
use crate::core::{AttractorSource, FrameClock, Peer, Preset, SimulationConfig};
use crate::error::PhysicsError;
use crate::forces::Attractor;
use crate::Result;

use tracing::{debug, trace};

/// Summary of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    /// The delta every body was stepped with
    pub delta: f32,

    /// Bodies that ran their step
    pub stepped: usize,

    /// Bodies whose step was skipped by the frame-skip guard
    pub skipped: usize,

    /// Overlaps resolved across all bodies
    pub contacts: usize,
}

/// Owns a population of bodies and steps them once per frame
#[derive(Debug)]
pub struct Simulation {
    /// Bodies in insertion order, which is also the update order
    bodies: Vec<Body>,

    /// Immovable obstacles every body collides against
    obstacles: Vec<Obstacle>,

    /// Fixed attractor points, always part of the attractor set
    attractors: Vec<Attractor>,

    /// Configuration for the simulation
    config: SimulationConfig,

    /// Clock used by [`Simulation::step_realtime`]
    clock: FrameClock,

    /// Total simulated time in seconds
    time: f32,

    /// Number of completed steps
    frame: u64,
}

impl Simulation {
    /// Creates a simulation with the default configuration
    pub fn new() -> Self {
        Self::from_parts(SimulationConfig::default())
    }

    /// Creates a simulation with the given configuration
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    /// Creates a simulation for a deployment preset
    pub fn with_preset(preset: Preset) -> Self {
        Self::from_parts(SimulationConfig::preset(preset))
    }

    fn from_parts(config: SimulationConfig) -> Self {
        debug!(?config, "creating simulation");
        Self {
            bodies: Vec::new(),
            obstacles: Vec::new(),
            attractors: Vec::new(),
            config,
            clock: FrameClock::new(),
            time: 0.0,
            frame: 0,
        }
    }

    /// Returns the total simulated time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Returns the number of completed steps
    pub fn get_frame(&self) -> u64 {
        self.frame
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replaces the configuration after validating it
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Adds a body and returns its id
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = body.id();
        self.bodies.push(body);
        id
    }

    /// Removes a body, keeping the order of the others
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        let index = self.index_of(id)?;
        Ok(self.bodies.remove(index))
    }

    /// Gets a reference to a body by its id
    pub fn get_body(&self, id: BodyId) -> Result<&Body> {
        let index = self.index_of(id)?;
        Ok(&self.bodies[index])
    }

    /// Gets a mutable reference to a body by its id
    pub fn get_body_mut(&mut self, id: BodyId) -> Result<&mut Body> {
        let index = self.index_of(id)?;
        Ok(&mut self.bodies[index])
    }

    /// Returns every body in update order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Adds an obstacle
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Returns every obstacle
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Adds a fixed attractor point
    pub fn add_attractor(&mut self, attractor: Attractor) {
        self.attractors.push(attractor);
    }

    /// Returns the fixed attractor points
    pub fn attractors(&self) -> &[Attractor] {
        &self.attractors
    }

    fn index_of(&self, id: BodyId) -> Result<usize> {
        self.bodies
            .iter()
            .position(|body| body.id() == id)
            .ok_or_else(|| PhysicsError::ResourceNotFound(format!("body {id}")))
    }

    /// Collects the attractors acting on the body at `index`
    fn attractors_for(&self, index: usize) -> Vec<Attractor> {
        let mut attractors = self.attractors.clone();
        let others = self
            .bodies
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, body)| body);

        match self.config.attractor_source {
            AttractorSource::AllBodies => attractors.extend(others.map(Attractor::from)),
            AttractorSource::Flagged => {
                attractors.extend(others.filter(|body| body.is_attractor()).map(Attractor::from))
            }
            AttractorSource::FixedOnly => {}
        }

        attractors
    }

    /// Measures the time since the previous realtime step and steps by it
    pub fn step_realtime(&mut self) -> Result<StepReport> {
        let delta = self.clock.tick();
        self.step(delta)
    }

    /// Steps every body by the same `delta`, in insertion order.
    ///
    /// Each body sees the others as they are at its turn, so bodies earlier
    /// in the order have already moved this frame. Attractors are taken after
    /// the body's collisions. A step that leaves a body non-finite returns an
    /// error without counting as a completed frame; the bodies keep whatever
    /// state the step gave them.
    pub fn step(&mut self, delta: f32) -> Result<StepReport> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "step delta must be finite and non-negative, got {delta}"
            )));
        }

        let mut report = StepReport {
            delta,
            ..StepReport::default()
        };

        for index in 0..self.bodies.len() {
            let (before, rest) = self.bodies.split_at_mut(index);
            let Some((body, after)) = rest.split_first_mut() else {
                break;
            };

            let peers = before
                .iter_mut()
                .chain(after.iter_mut())
                .map(Peer::Body)
                .chain(self.obstacles.iter().map(Peer::Obstacle));

            let Some(contacts) = body.collide(peers, &self.config, delta) else {
                report.skipped += 1;
                continue;
            };

            // Peers pushed apart above pull from where they are now
            let attractors = self.attractors_for(index);
            self.bodies[index].advance(&attractors, &self.config, delta);

            report.stepped += 1;
            report.contacts += contacts;
        }

        if let Some(body) = self.bodies.iter().find(|body| !body.is_finite()) {
            return Err(PhysicsError::SimulationError(format!(
                "body {} left the step with non-finite state",
                body.id()
            )));
        }

        self.frame += 1;
        if report.stepped > 0 {
            self.time += delta;
        }

        trace!(frame = self.frame, ?report, "simulation step");
        Ok(report)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

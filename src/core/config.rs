use crate::error::PhysicsError;
use crate::forces::GravityModel;
use crate::math::Vector3;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Which bodies act as attractors during a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum AttractorSource {
    /// Every other body pulls on every body
    #[default]
    AllBodies,

    /// Only bodies flagged as attractors pull
    Flagged,

    /// Only the fixed attractor points registered with the simulation pull
    FixedOnly,
}

/// Known deployment configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Preset {
    /// Unbounded floating scene at full integration speed
    Floating,

    /// Unbounded scene with clamped, weighted pull and slowed integration
    Weighted,

    /// Bodies confined to a box and pulled by flagged attractors
    Boxed,
}

/// Configuration parameters for the simulation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Full size of the confining box, or `None` for an unbounded scene
    pub domain: Option<Vector3>,

    /// Scene-wide multiplier on every gravity contribution
    pub gravity_scale: f32,

    /// Upper bound on velocity length
    pub speed_limit: Option<f32>,

    /// Factor applied to `velocity * delta` when moving a body
    pub integration_scale: f32,

    /// The attraction field
    pub gravity: GravityModel,

    /// Acceleration applied when a body has no attractors
    pub fallback_gravity: Vector3,

    /// Velocity factor kept after a wall bounce
    pub boundary_damping: f32,

    /// Steps with a longer delta (in seconds) are skipped entirely
    pub frame_skip_threshold: f32,

    /// Normal used when two sphere centres coincide
    pub coincident_normal: Vector3,

    /// Which bodies act as attractors
    pub attractor_source: AttractorSource,
}

impl SimulationConfig {
    /// Creates the configuration of a deployment preset
    pub fn preset(preset: Preset) -> Self {
        let base = Self::default();
        match preset {
            Preset::Floating => base,
            Preset::Weighted => Self {
                integration_scale: 0.1,
                gravity: GravityModel {
                    max_distance: Vector3::splat(200.0),
                    pull_clamp: Some(50.0),
                },
                ..base
            },
            Preset::Boxed => Self {
                domain: Some(Vector3::new(120.0, 80.0, 40.0)),
                integration_scale: 0.1,
                gravity: GravityModel {
                    max_distance: Vector3::new(60.0, 40.0, 20.0),
                    pull_clamp: None,
                },
                attractor_source: AttractorSource::Flagged,
                ..base
            },
        }
    }

    /// Returns the half extents of the confining box, if any
    pub fn half_extent(&self) -> Option<Vector3> {
        self.domain.map(|size| size * 0.5)
    }

    /// Checks that every tunable is finite and in range
    pub fn validate(&self) -> Result<()> {
        fn invalid(message: String) -> Result<()> {
            Err(PhysicsError::InvalidParameter(message))
        }

        if let Some(domain) = self.domain {
            if !domain.is_finite() || domain.x <= 0.0 || domain.y <= 0.0 || domain.z <= 0.0 {
                return invalid(format!("domain must be positive and finite, got {domain}"));
            }
        }
        if !self.gravity_scale.is_finite() {
            return invalid(format!("gravity scale must be finite, got {}", self.gravity_scale));
        }
        if let Some(limit) = self.speed_limit {
            if !limit.is_finite() || limit < 0.0 {
                return invalid(format!("speed limit must be non-negative, got {limit}"));
            }
        }
        if !self.integration_scale.is_finite() || self.integration_scale <= 0.0 {
            return invalid(format!(
                "integration scale must be positive, got {}",
                self.integration_scale
            ));
        }
        if !self.gravity.max_distance.is_finite() {
            return invalid("max distance must be finite".to_string());
        }
        if let Some(clamp) = self.gravity.pull_clamp {
            if !clamp.is_finite() || clamp < 0.0 {
                return invalid(format!("pull clamp must be non-negative, got {clamp}"));
            }
        }
        if !self.fallback_gravity.is_finite() {
            return invalid("fallback gravity must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.boundary_damping) {
            return invalid(format!(
                "boundary damping must lie in [0, 1], got {}",
                self.boundary_damping
            ));
        }
        if !self.frame_skip_threshold.is_finite() || self.frame_skip_threshold <= 0.0 {
            return invalid(format!(
                "frame skip threshold must be positive, got {}",
                self.frame_skip_threshold
            ));
        }
        if self.coincident_normal.try_normalize().is_none() || !self.coincident_normal.is_finite() {
            return invalid("coincident normal must be a non-zero vector".to_string());
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            domain: None,
            gravity_scale: 1.0,
            speed_limit: None,
            integration_scale: 1.0,
            gravity: GravityModel::default(),
            fallback_gravity: Vector3::new(0.0, -9.8, 0.0),
            boundary_damping: 0.9,
            frame_skip_threshold: 1.0,
            coincident_normal: Vector3::unit_y(),
            attractor_source: AttractorSource::AllBodies,
        }
    }
}

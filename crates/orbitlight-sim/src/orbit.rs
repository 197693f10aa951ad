//! Orbital pose stepper.
//!
//! Pure functions over plain data: derive the light position from the
//! current pose, then advance the pose by one fixed step. No timer or
//! listener dependency, so trajectories can be computed offline.

use std::f64::consts::TAU;

use orbitlight_core::config::OrbitConfig;
use orbitlight_core::types::Vector3;

/// Direction of the vertical oscillation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalPhase {
    /// Offset increasing toward the upper bound.
    #[default]
    Rising,
    /// Offset decreasing toward zero.
    Falling,
}

/// Per-tick increments, derived once from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSteps {
    /// Horizontal sweep per tick (radians).
    pub horizontal_step: f64,
    /// Span of the vertical oscillation, `max - min` (radians).
    pub vertical_delta: f64,
    /// Vertical offset change per tick (radians).
    pub vertical_step: f64,
}

impl OrbitSteps {
    pub fn from_config(config: &OrbitConfig) -> Self {
        let vertical_delta = config.max_vertical_angle - config.min_vertical_angle;
        Self {
            horizontal_step: TAU * config.tick_interval_ms / config.horizontal_lap_ms,
            vertical_delta,
            vertical_step: vertical_delta * config.tick_interval_ms / config.vertical_lap_ms,
        }
    }
}

/// Current orbital pose.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitState {
    horizontal_angle: f64,
    vertical_offset: f64,
    phase: VerticalPhase,
}

impl OrbitState {
    /// The canonical starting pose: angle 0, offset 0, rising.
    pub fn initial() -> Self {
        Self::default()
    }

    /// Current horizontal sweep angle (radians, `[0, 2π)`).
    pub fn horizontal_angle(&self) -> f64 {
        self.horizontal_angle
    }

    /// Current elevation above `min_vertical_angle` (radians).
    pub fn vertical_offset(&self) -> f64 {
        self.vertical_offset
    }

    pub fn phase(&self) -> VerticalPhase {
        self.phase
    }

    /// Light position for the current pose.
    pub fn position(&self, config: &OrbitConfig) -> Vector3 {
        let vertical_angle = config.min_vertical_angle + self.vertical_offset;
        let horizontal_radius = config.radius * vertical_angle.cos();

        Vector3::new(
            config.center.x + horizontal_radius * self.horizontal_angle.cos(),
            config.center.y + horizontal_radius * self.horizontal_angle.sin(),
            config.radius * vertical_angle.sin(),
        )
    }

    /// Advance one tick. Returns true when the vertical phase reversed.
    ///
    /// The horizontal angle wraps by a single subtraction of 2π. The
    /// vertical offset is not clamped and may pass a bound by up to one
    /// step before the phase flips.
    pub fn advance(&mut self, steps: &OrbitSteps) -> bool {
        self.horizontal_angle += steps.horizontal_step;
        if self.horizontal_angle >= TAU {
            self.horizontal_angle -= TAU;
        }

        let previous = self.phase;
        match self.phase {
            VerticalPhase::Rising => {
                self.vertical_offset += steps.vertical_step;
                if self.vertical_offset >= steps.vertical_delta {
                    self.phase = VerticalPhase::Falling;
                }
            }
            VerticalPhase::Falling => {
                self.vertical_offset -= steps.vertical_step;
                if self.vertical_offset <= 0.0 {
                    self.phase = VerticalPhase::Rising;
                }
            }
        }
        self.phase != previous
    }

    /// Return to the canonical starting pose.
    pub fn reset(&mut self) {
        *self = Self::initial();
    }

    /// Positions published by the first `ticks` ticks from the starting pose.
    pub fn trajectory(config: &OrbitConfig, ticks: usize) -> Vec<Vector3> {
        let steps = OrbitSteps::from_config(config);
        let mut state = Self::initial();
        (0..ticks)
            .map(|_| {
                let position = state.position(config);
                state.advance(&steps);
                position
            })
            .collect()
    }
}

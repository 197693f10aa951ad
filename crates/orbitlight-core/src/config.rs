//! Orbit configuration supplied to a simulator at construction.
//!
//! The record is read-only for the lifetime of a simulator. Changing it
//! means building a new simulator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, Result};

/// Orbit center in normalized surface coordinates (typically [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitCenter {
    pub x: f64,
    pub y: f64,
}

impl Default for OrbitCenter {
    fn default() -> Self {
        Self {
            x: DEFAULT_CENTER_X,
            y: DEFAULT_CENTER_Y,
        }
    }
}

/// Tunable parameters of the light orbit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Milliseconds for one full 360° horizontal sweep.
    pub horizontal_lap_ms: f64,
    /// Milliseconds for one full rise or fall of the elevation.
    pub vertical_lap_ms: f64,
    /// Lower elevation bound (radians).
    pub min_vertical_angle: f64,
    /// Upper elevation bound (radians).
    pub max_vertical_angle: f64,
    /// Milliseconds between simulation steps.
    pub tick_interval_ms: f64,
    pub center: OrbitCenter,
    /// Orbit radius, normalized units.
    pub radius: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            horizontal_lap_ms: DEFAULT_HORIZONTAL_LAP_MS,
            vertical_lap_ms: DEFAULT_VERTICAL_LAP_MS,
            min_vertical_angle: DEFAULT_MIN_VERTICAL_ANGLE,
            max_vertical_angle: DEFAULT_MAX_VERTICAL_ANGLE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            center: OrbitCenter::default(),
            radius: DEFAULT_RADIUS,
        }
    }
}

impl OrbitConfig {
    /// Parse a JSON document and validate it. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: OrbitConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the documented preconditions.
    ///
    /// NaN values fail the positivity checks.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("horizontal_lap_ms", self.horizontal_lap_ms),
            ("vertical_lap_ms", self.vertical_lap_ms),
            ("tick_interval_ms", self.tick_interval_ms),
            ("radius", self.radius),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.min_vertical_angle.is_nan() || self.min_vertical_angle < 0.0 {
            return Err(ConfigError::NegativeMinAngle(self.min_vertical_angle));
        }
        if self.max_vertical_angle.is_nan() || self.min_vertical_angle >= self.max_vertical_angle {
            return Err(ConfigError::EmptyVerticalRange {
                min: self.min_vertical_angle,
                max: self.max_vertical_angle,
            });
        }

        Ok(())
    }

    /// Tick interval as a `Duration`. Degenerate values map to zero.
    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.tick_interval_ms / 1000.0).unwrap_or(Duration::ZERO)
    }
}

//! Default orbit tuning parameters.
//!
//! These are consumed by `OrbitConfig::default()` and by the host binary.
//! The simulator itself never reads them.

use std::f64::consts::PI;

/// One full 360° horizontal sweep (milliseconds).
pub const DEFAULT_HORIZONTAL_LAP_MS: f64 = 12_000.0;

/// One full rise or fall of the vertical oscillation (milliseconds).
pub const DEFAULT_VERTICAL_LAP_MS: f64 = 5_000.0;

/// Lowest elevation of the light (radians, ~11°).
pub const DEFAULT_MIN_VERTICAL_ANGLE: f64 = PI / 16.0;

/// Highest elevation of the light (radians, 60°).
pub const DEFAULT_MAX_VERTICAL_ANGLE: f64 = PI / 3.0;

/// Interval between simulation steps (milliseconds). ~60Hz.
pub const DEFAULT_TICK_INTERVAL_MS: f64 = 16.0;

/// Orbit center, normalized surface coordinates.
pub const DEFAULT_CENTER_X: f64 = 0.5;
pub const DEFAULT_CENTER_Y: f64 = 0.5;

/// Orbit radius, normalized units.
pub const DEFAULT_RADIUS: f64 = 0.75;

//! Light-position simulator for ORBITLIGHT.
//!
//! Advances an orbital pose at a fixed tick rate and publishes the light
//! position to registered listeners.

pub mod listeners;
pub mod orbit;
pub mod scheduler;
pub mod simulator;

pub use orbitlight_core as core;
pub use simulator::LightSimulator;

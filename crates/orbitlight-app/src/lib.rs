//! ORBITLIGHT headless host.
//!
//! Stands in for the renderer: wires a configuration into a simulator,
//! receives every published position, and streams it as JSON lines.

pub mod args;
pub mod render_loop;

pub use orbitlight_core as core;

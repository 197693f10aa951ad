//! Core types and definitions for the ORBITLIGHT simulator.
//!
//! This crate defines the vocabulary shared across the other crates:
//! the position vector, the orbit configuration, default constants,
//! configuration errors, and the frame streamed to renderers.
//! It has no dependency on any timer or runtime framework.

pub mod config;
pub mod constants;
pub mod error;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

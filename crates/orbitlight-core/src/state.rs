//! Frame streamed to the renderer after each tick.

use serde::{Deserialize, Serialize};

use crate::types::Vector3;

/// One published light position, numbered by the host in arrival order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LightFrame {
    /// 1-based tick number since the last start.
    pub tick: u64,
    pub position: Vector3,
}

//! Fundamental geometric types.

use serde::{Deserialize, Serialize};

/// 3D light position in normalized surface space.
/// x and y span the lit surface, z is the height above it.
///
/// Immutable once constructed; a fresh value is produced on every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Components in `[x, y, z]` order, narrowed for shader uniforms.
    pub fn to_f32_array(&self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl From<Vector3> for glam::DVec3 {
    fn from(v: Vector3) -> Self {
        glam::DVec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::DVec3> for Vector3 {
    fn from(v: glam::DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

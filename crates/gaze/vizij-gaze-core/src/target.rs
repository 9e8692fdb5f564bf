use serde::{Deserialize, Serialize};

/// Normalized gaze direction. `x` yaw (positive right), `y` pitch (positive up),
/// `z` head roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeTarget {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GazeTarget {
    pub const NEUTRAL: GazeTarget = GazeTarget {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn scaled(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

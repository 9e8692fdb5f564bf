//! Gaze tuning.

use serde::{Deserialize, Serialize};
use vizij_animation_core::Easing;

use crate::behavior::GazeBehaviorConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GazeConfig {
    pub eye_intensity: f32,
    pub head_intensity: f32,
    pub eye_duration_ms: f32,
    pub head_duration_ms: f32,
    /// Keyframe intervals per ramp.
    pub steps: u32,
    /// Axis changes smaller than this are not animated.
    pub threshold: f32,
    /// Head ramps start this long after the eye ramp.
    pub head_follow_delay_ms: f32,
    pub eye_priority: i32,
    pub head_priority: i32,
    pub easing: Easing,
    pub head_enabled: bool,
    pub behavior: GazeBehaviorConfig,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            eye_intensity: 1.0,
            head_intensity: 0.5,
            eye_duration_ms: 200.0,
            head_duration_ms: 400.0,
            steps: 8,
            threshold: 0.01,
            head_follow_delay_ms: 0.0,
            eye_priority: 20,
            head_priority: 15,
            easing: Easing::CubicOut,
            head_enabled: true,
            behavior: GazeBehaviorConfig::default(),
        }
    }
}

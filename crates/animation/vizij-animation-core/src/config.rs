//! Scheduler and transition engine configuration.

use serde::{Deserialize, Serialize};

/// Inclusive clamp range applied to every sampled intensity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleBand {
    pub min: f32,
    pub max: f32,
}

impl SampleBand {
    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Band for single-channel curves. Tolerates slight overshoot from eased keys.
    pub sample_band: SampleBand,
    /// Band for continuum pair curves (signed).
    pub continuum_band: SampleBand,
    /// Non-looping snippets complete once `current_time >= duration - completion_epsilon`.
    pub completion_epsilon: f32,
    /// Initial capacity hint for the active snippet list.
    pub snippet_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sample_band: SampleBand { min: 0.0, max: 2.0 },
            continuum_band: SampleBand { min: -2.0, max: 2.0 },
            completion_epsilon: 1e-6,
            snippet_capacity: 32,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionConfig {
    /// `|from - to|` below this is applied immediately.
    pub degenerate_epsilon: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            degenerate_epsilon: 1e-4,
        }
    }
}

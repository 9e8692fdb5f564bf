//! Lip-sync tuning.

use serde::{Deserialize, Serialize};

use crate::prosody::ProsodyConfig;
use crate::recognition::InterruptPolicy;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LipSyncConfig {
    /// Phoneme durations are divided by this. Values below 0.1 are raised to 0.1.
    pub speech_rate: f32,
    /// Peak viseme intensity.
    pub intensity: f32,
    /// Multiplier on per-phoneme jaw coefficients.
    pub jaw_activation: f32,
    /// Jaw keys are only emitted for coefficients above this.
    pub jaw_threshold: f32,
    /// Fraction of each event spent rising to peak (clamped to 0.10..=0.25).
    pub attack_ratio: f32,
    /// Fraction of each event spent falling to zero (clamped to 0.10..=0.40).
    pub release_ratio: f32,
    /// Held level before release, relative to peak.
    pub sustain_level: f32,
    pub word_priority: i32,
    pub neutral_priority: i32,
    pub neutral_window_ms: f32,
    /// Merge adjacent events that share a viseme.
    pub coarticulation: bool,
    pub interrupt_policy: InterruptPolicy,
    pub prosody: ProsodyConfig,
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            speech_rate: 1.0,
            intensity: 1.0,
            jaw_activation: 1.0,
            jaw_threshold: 0.1,
            attack_ratio: 0.2,
            release_ratio: 0.3,
            sustain_level: 0.9,
            word_priority: 50,
            neutral_priority: 60,
            neutral_window_ms: 120.0,
            coarticulation: true,
            interrupt_policy: InterruptPolicy::default(),
            prosody: ProsodyConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: LipSyncConfig =
            serde_json::from_str(r#"{"speechRate": 1.5, "interruptPolicy": "onFinal"}"#).unwrap();
        assert_eq!(cfg.speech_rate, 1.5);
        assert_eq!(cfg.interrupt_policy, InterruptPolicy::OnFinal);
        assert_eq!(cfg.word_priority, 50);
        assert!(cfg.coarticulation);
    }
}

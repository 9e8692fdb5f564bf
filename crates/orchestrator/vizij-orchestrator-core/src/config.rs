//! Engine configuration, exchanged as camelCase JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vizij_animation_core::{SchedulerConfig, TransitionConfig};
use vizij_gaze_core::GazeConfig;
use vizij_speech_core::LipSyncConfig;

use crate::scheduler::TickOrder;

/// Behaviour modules the engine instantiates, in tick order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BehaviorKind {
    LipSync,
    Gaze,
    IdleGaze,
    Conversation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaceEngineConfig {
    pub tick_order: TickOrder,
    pub behaviors: Vec<BehaviorKind>,
    pub scheduler: SchedulerConfig,
    pub transitions: TransitionConfig,
    pub lipsync: LipSyncConfig,
    pub gaze: GazeConfig,
}

impl Default for FaceEngineConfig {
    fn default() -> Self {
        Self {
            tick_order: TickOrder::default(),
            behaviors: vec![
                BehaviorKind::LipSync,
                BehaviorKind::Gaze,
                BehaviorKind::Conversation,
            ],
            scheduler: SchedulerConfig::default(),
            transitions: TransitionConfig::default(),
            lipsync: LipSyncConfig::default(),
            gaze: GazeConfig::default(),
        }
    }
}

impl FaceEngineConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("invalid face engine config")
    }

    pub fn enables(&self, kind: BehaviorKind) -> bool {
        self.behaviors.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg = FaceEngineConfig::from_json(
            r#"{"tickOrder": "transitionsFirst", "behaviors": ["gaze", "idleGaze"], "gaze": {"headEnabled": false}}"#,
        )
        .unwrap();
        assert_eq!(cfg.tick_order, TickOrder::TransitionsFirst);
        assert!(cfg.enables(BehaviorKind::IdleGaze));
        assert!(!cfg.enables(BehaviorKind::LipSync));
        assert!(!cfg.gaze.head_enabled);
        assert_eq!(cfg.gaze.eye_priority, 20);
        assert_eq!(cfg.lipsync.word_priority, 50);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = FaceEngineConfig::from_json(r#"{"tickOrder": 3}"#).unwrap_err();
        assert!(err.to_string().contains("face engine config"));
    }
}

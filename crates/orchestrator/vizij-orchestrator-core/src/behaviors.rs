//! Behaviour registry: the modules a `FaceEngine` ticks, chosen by config.

use vizij_gaze_core::{GazeBehavior, GazeScheduler};
use vizij_speech_core::LipSyncController;

use crate::config::{BehaviorKind, FaceEngineConfig};
use crate::conversation::ConversationFlow;

#[derive(Debug)]
pub enum BehaviorModule {
    LipSync(LipSyncController),
    Gaze(GazeScheduler),
    IdleGaze(GazeBehavior),
    Conversation(ConversationFlow),
}

impl BehaviorModule {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            BehaviorModule::LipSync(_) => BehaviorKind::LipSync,
            BehaviorModule::Gaze(_) => BehaviorKind::Gaze,
            BehaviorModule::IdleGaze(_) => BehaviorKind::IdleGaze,
            BehaviorModule::Conversation(_) => BehaviorKind::Conversation,
        }
    }
}

#[derive(Debug, Default)]
pub struct BehaviorRegistry {
    modules: Vec<BehaviorModule>,
}

macro_rules! module_accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self) -> Option<&$ty> {
            self.modules.iter().find_map(|m| match m {
                BehaviorModule::$variant(inner) => Some(inner),
                _ => None,
            })
        }

        pub fn $get_mut(&mut self) -> Option<&mut $ty> {
            self.modules.iter_mut().find_map(|m| match m {
                BehaviorModule::$variant(inner) => Some(inner),
                _ => None,
            })
        }
    };
}

impl BehaviorRegistry {
    /// One module per listed kind; repeats are ignored.
    pub fn from_config(cfg: &FaceEngineConfig, jaw_au: u32, viseme_count: usize) -> Self {
        let mut registry = Self::default();
        for kind in &cfg.behaviors {
            if registry.contains(*kind) {
                log::warn!("behaviours: duplicate {kind:?} ignored");
                continue;
            }
            let module = match kind {
                BehaviorKind::LipSync => BehaviorModule::LipSync(LipSyncController::new(
                    cfg.lipsync.clone(),
                    jaw_au,
                    viseme_count,
                )),
                BehaviorKind::Gaze => BehaviorModule::Gaze(GazeScheduler::new(cfg.gaze.clone())),
                BehaviorKind::IdleGaze => {
                    BehaviorModule::IdleGaze(GazeBehavior::new(cfg.gaze.behavior.clone()))
                }
                BehaviorKind::Conversation => BehaviorModule::Conversation(ConversationFlow::new()),
            };
            registry.modules.push(module);
        }
        registry
    }

    pub fn contains(&self, kind: BehaviorKind) -> bool {
        self.modules.iter().any(|m| m.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<BehaviorKind> {
        self.modules.iter().map(BehaviorModule::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    module_accessors!(lipsync, lipsync_mut, LipSync, LipSyncController);
    module_accessors!(gaze, gaze_mut, Gaze, GazeScheduler);
    module_accessors!(idle_gaze, idle_gaze_mut, IdleGaze, GazeBehavior);
    module_accessors!(conversation, conversation_mut, Conversation, ConversationFlow);
}

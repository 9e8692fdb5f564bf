//! Prosodic gestures: short brow raises and head nods riding on emphasized words.

use serde::{Deserialize, Serialize};
use vizij_animation_core::{Keyframe, SnippetCategory, SnippetSpec};

pub const PROSODY_SNIPPET_PREFIX: &str = "prosody:";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProsodyConfig {
    pub enabled: bool,
    /// Add a small nod on every Nth word (1-based). `None` disables it.
    pub every_nth: Option<u32>,
    pub priority: i32,
    pub intensity: f32,
}

impl Default for ProsodyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            every_nth: None,
            priority: 30,
            intensity: 1.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProsodyPlanner {
    cfg: ProsodyConfig,
}

fn keys(points: &[(f32, f32)], scale: f32) -> Vec<Keyframe> {
    points
        .iter()
        .map(|&(t, v)| Keyframe::new(t, v * scale))
        .collect()
}

const BROW_RAISE: &[(f32, f32)] = &[(0.0, 0.0), (0.15, 0.6), (0.45, 0.6), (0.7, 0.0)];
// head pitch on the 54/53 pair: negative dips toward AU54
const NOD: &[(f32, f32)] = &[(0.0, 0.0), (0.15, -0.4), (0.35, 0.1), (0.5, 0.0)];
const SMALL_NOD: &[(f32, f32)] = &[(0.0, 0.0), (0.12, -0.2), (0.3, 0.0)];

impl ProsodyPlanner {
    pub fn new(cfg: ProsodyConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &ProsodyConfig {
        &self.cfg
    }

    /// Gesture for the word at `index` (0-based), if it is emphasized.
    pub fn plan(&self, word: &str, index: u32) -> Option<SnippetSpec> {
        if !self.cfg.enabled {
            return None;
        }
        let scale = self.cfg.intensity;
        let spec = SnippetSpec::new(
            format!("{PROSODY_SNIPPET_PREFIX}{index}"),
            SnippetCategory::Prosodic,
        )
        .with_priority(self.cfg.priority);

        let trimmed = word.trim_end();
        if trimmed.ends_with('!') {
            return Some(
                spec.with_curve("1", keys(BROW_RAISE, scale))
                    .with_curve("2", keys(BROW_RAISE, scale))
                    .with_curve("54:53", keys(NOD, scale)),
            );
        }
        if trimmed.ends_with('?') {
            return Some(
                spec.with_curve("1", keys(BROW_RAISE, scale))
                    .with_curve("2", keys(BROW_RAISE, scale)),
            );
        }
        match self.cfg.every_nth {
            Some(n) if n > 0 && (index + 1) % n == 0 => {
                Some(spec.with_curve("54:53", keys(SMALL_NOD, scale)))
            }
            _ => None,
        }
    }
}

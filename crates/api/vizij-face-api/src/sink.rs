//! Renderer-facing apply interface.
//!
//! Hosts implement `RigSink` over their scene graph (morph target arrays and
//! skeleton nodes). Both calls must be idempotent; the core re-sends the full
//! pose every frame.

use hashbrown::HashMap;

use crate::write_ops::{BonePose, BoneWrite};
use crate::{Quat, Vec3};

pub trait RigSink {
    /// Set a morph target weight by name. Unknown names are ignored by the host.
    fn apply_morph(&mut self, name: &str, value: f32);

    /// Set a bone's local rotation or translation.
    fn apply_bone(&mut self, write: &BoneWrite);
}

/// Sink that records the last value per morph and bone. Useful for tests and
/// headless hosts.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub morphs: HashMap<String, f32>,
    pub rotations: HashMap<String, Quat>,
    pub translations: HashMap<String, Vec3>,
    pub morph_calls: usize,
    pub bone_calls: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn morph(&self, name: &str) -> f32 {
        self.morphs.get(name).copied().unwrap_or(0.0)
    }

    pub fn rotation(&self, key: &str) -> Option<Quat> {
        self.rotations.get(key).copied()
    }

    pub fn translation(&self, key: &str) -> Option<Vec3> {
        self.translations.get(key).copied()
    }
}

impl RigSink for RecordingSink {
    fn apply_morph(&mut self, name: &str, value: f32) {
        self.morph_calls += 1;
        self.morphs.insert(name.to_string(), value);
    }

    fn apply_bone(&mut self, write: &BoneWrite) {
        self.bone_calls += 1;
        match write.pose {
            BonePose::Rotation(q) => {
                self.rotations.insert(write.key.clone(), q);
            }
            BonePose::Translation(p) => {
                self.translations.insert(write.key.clone(), p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write_ops::RigWriteBatch;

    #[test]
    fn batch_applies_last_value_per_target() {
        let mut batch = RigWriteBatch::new();
        batch.push_morph("Jaw_Open", 0.4);
        batch.push_bone(BoneWrite {
            key: "HEAD".into(),
            node: "CC_Base_Head".into(),
            pose: BonePose::Rotation([0.0, 0.0, 0.0, 1.0]),
        });
        let mut sink = RecordingSink::new();
        batch.apply_to(&mut sink);
        batch.apply_to(&mut sink);
        assert_eq!(sink.morph("Jaw_Open"), 0.4);
        assert_eq!(sink.rotation("HEAD"), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(sink.morph_calls, 2);
        assert_eq!(sink.bone_calls, 2);
    }

    #[test]
    fn batch_serializes_with_tagged_pose() {
        let mut batch = RigWriteBatch::new();
        batch.push_bone(BoneWrite {
            key: "JAW".into(),
            node: "Jaw".into(),
            pose: BonePose::Translation([0.0, 0.1, 0.0]),
        });
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["bones"][0]["pose"]["type"], "translation");
    }
}

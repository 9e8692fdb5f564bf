//! Rig writes produced once per frame and handed to the renderer-facing sink.
//!
//! Bone poses are absolute local values computed relative to the bone's cached
//! base transform, so applying the same batch twice is a no-op for the renderer.

use serde::{Deserialize, Serialize};

use crate::sink::RigSink;
use crate::{Quat, Vec3};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MorphWrite {
    pub name: String,
    pub value: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum BonePose {
    /// Local orientation = base rotation composed with the frame's delta.
    Rotation(Quat),
    /// Local position = base position plus the frame's offset.
    Translation(Vec3),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneWrite {
    /// Semantic bone key from the profile (e.g. "HEAD").
    pub key: String,
    /// Resolved scene node name.
    pub node: String,
    pub pose: BonePose,
}

/// Per-frame list of morph and bone writes, in application order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigWriteBatch {
    pub morphs: Vec<MorphWrite>,
    pub bones: Vec<BoneWrite>,
}

impl RigWriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_morph(&mut self, name: impl Into<String>, value: f32) {
        self.morphs.push(MorphWrite {
            name: name.into(),
            value,
        });
    }

    #[inline]
    pub fn push_bone(&mut self, write: BoneWrite) {
        self.bones.push(write);
    }

    pub fn clear(&mut self) {
        self.morphs.clear();
        self.bones.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.morphs.is_empty() && self.bones.is_empty()
    }

    pub fn morph(&self, name: &str) -> Option<f32> {
        self.morphs
            .iter()
            .rev()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }

    pub fn bone<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a BoneWrite> + 'a {
        self.bones.iter().filter(move |b| b.key == key)
    }

    /// Forward every write to the sink, morphs first.
    pub fn apply_to(&self, sink: &mut dyn RigSink) {
        for m in &self.morphs {
            sink.apply_morph(&m.name, m.value);
        }
        for b in &self.bones {
            sink.apply_bone(b);
        }
    }
}

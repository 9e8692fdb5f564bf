//! Rig profile: the mapping document from AU ids to morphs and bones.
//!
//! Profiles are loaded once per rig (`Profile::from_json`) and swapped wholesale.
//! Maps are insertion-ordered so every iteration over a profile is deterministic.
//!
//! JSON shape (camelCase):
//! ```json
//! {
//!   "name": "cc4",
//!   "auToMorphs": { "12": { "left": ["Mouth_Smile_L"], "right": ["Mouth_Smile_R"] } },
//!   "auToBones": { "51": [{ "bone": "HEAD", "channel": "ry", "scale": 1, "maxDegrees": 30 }] },
//!   "boneNodes": { "HEAD": { "name": "Head", "candidates": ["head"] } },
//!   "bonePrefix": "CC_Base_",
//!   "compositeRotations": [{ "bone": "HEAD", "yaw": { "pair": [51, 52], "axis": "ry" } }],
//!   "auMixWeights": { "51": 0.7 },
//!   "visemeKeys": ["V_AE", "V_Ah"],
//!   "jawAu": 26
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vizij_face_api::Vec3;

use crate::error::RigError;

/// Bone channel driven by a binding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoneChannel {
    Rx,
    Ry,
    Rz,
    Tx,
    Ty,
    Tz,
}

impl BoneChannel {
    #[inline]
    pub fn is_rotation(self) -> bool {
        matches!(self, BoneChannel::Rx | BoneChannel::Ry | BoneChannel::Rz)
    }

    /// Unit axis in bone-local space.
    #[inline]
    pub fn axis(self) -> Vec3 {
        match self {
            BoneChannel::Rx | BoneChannel::Tx => [1.0, 0.0, 0.0],
            BoneChannel::Ry | BoneChannel::Ty => [0.0, 1.0, 0.0],
            BoneChannel::Rz | BoneChannel::Tz => [0.0, 0.0, 1.0],
        }
    }
}

fn one() -> f32 {
    1.0
}

/// One AU → bone contribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneBinding {
    /// Semantic bone key (resolved through `boneNodes`).
    pub bone: String,
    pub channel: BoneChannel,
    /// Signed scale; the sign carries the rotation direction.
    #[serde(default = "one")]
    pub scale: f32,
    /// Rotation at full intensity, in degrees.
    #[serde(default)]
    pub max_degrees: Option<f32>,
    /// Translation at full intensity, in scene units.
    #[serde(default)]
    pub max_units: Option<f32>,
}

/// Morph names driven by one AU, split by face side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MorphSet {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
    #[serde(default)]
    pub center: Vec<String>,
}

impl MorphSet {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty() && self.center.is_empty()
    }

    /// All names: left, then right, then center.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.left
            .iter()
            .chain(self.right.iter())
            .chain(self.center.iter())
            .map(String::as_str)
    }
}

/// Naming rule for one semantic bone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneNodeRule {
    /// Base node name; defaults to the semantic key itself.
    #[serde(default)]
    pub name: Option<String>,
    /// Exact names tried last, in order.
    #[serde(default)]
    pub candidates: Vec<String>,
}

/// Where an axis value comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisSource {
    /// Signed continuum pair `[negative, positive]`: value = pos - neg.
    Pair([u32; 2]),
    /// Strongest AU wins; exact ties keep the first listed.
    MaxOf(Vec<u32>),
}

impl AxisSource {
    pub fn aus(&self) -> Vec<u32> {
        match self {
            AxisSource::Pair(pair) => pair.to_vec(),
            AxisSource::MaxOf(list) => list.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    #[serde(flatten)]
    pub source: AxisSource,
    /// Rotation channel this axis turns about.
    pub axis: BoneChannel,
    #[serde(default)]
    pub flip: bool,
    /// Used when the contributing AU has no matching bone binding.
    #[serde(default)]
    pub max_degrees: Option<f32>,
}

/// Per-bone composite rotation definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeRotation {
    pub bone: String,
    #[serde(default)]
    pub pitch: Option<AxisConfig>,
    #[serde(default)]
    pub yaw: Option<AxisConfig>,
    #[serde(default)]
    pub roll: Option<AxisConfig>,
}

impl CompositeRotation {
    /// Axes in composition order: yaw, pitch, roll.
    pub fn axes(&self) -> [(&'static str, Option<&AxisConfig>); 3] {
        [
            ("yaw", self.yaw.as_ref()),
            ("pitch", self.pitch.as_ref()),
            ("roll", self.roll.as_ref()),
        ]
    }
}

fn default_mix_weight() -> f32 {
    0.5
}

fn default_jaw_au() -> u32 {
    26
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub au_to_morphs: IndexMap<u32, MorphSet>,
    #[serde(default)]
    pub au_to_bones: IndexMap<u32, Vec<BoneBinding>>,
    #[serde(default)]
    pub bone_nodes: IndexMap<String, BoneNodeRule>,
    #[serde(default)]
    pub bone_prefix: String,
    #[serde(default)]
    pub bone_suffix: String,
    #[serde(default)]
    pub composite_rotations: Vec<CompositeRotation>,
    #[serde(default)]
    pub au_mix_weights: IndexMap<u32, f32>,
    /// Mix weight for AUs that drive both morphs and bones but have no explicit entry.
    #[serde(default = "default_mix_weight")]
    pub default_mix_weight: f32,
    /// Morph name per viseme index.
    #[serde(default)]
    pub viseme_keys: Vec<String>,
    /// AU reserved for the lip-sync jaw channel.
    #[serde(default = "default_jaw_au")]
    pub jaw_au: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            au_to_morphs: IndexMap::new(),
            au_to_bones: IndexMap::new(),
            bone_nodes: IndexMap::new(),
            bone_prefix: String::new(),
            bone_suffix: String::new(),
            composite_rotations: Vec::new(),
            au_mix_weights: IndexMap::new(),
            default_mix_weight: default_mix_weight(),
            viseme_keys: Vec::new(),
            jaw_au: default_jaw_au(),
        }
    }
}

impl Profile {
    /// Parse and validate a profile document.
    pub fn from_json(s: &str) -> Result<Self, RigError> {
        let profile: Profile = serde_json::from_str(s)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json(&self) -> Result<String, RigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Structural checks that serde cannot express.
    pub fn validate(&self) -> Result<(), RigError> {
        for cr in &self.composite_rotations {
            for (axis_name, axis) in cr.axes() {
                let Some(axis) = axis else { continue };
                if !axis.axis.is_rotation() {
                    return Err(RigError::NonRotationAxis {
                        bone: cr.bone.clone(),
                        axis: axis_name,
                    });
                }
                if axis.source.aus().is_empty() {
                    return Err(RigError::EmptyAxis {
                        bone: cr.bone.clone(),
                        axis: axis_name,
                    });
                }
            }
        }
        for (au, weight) in &self.au_mix_weights {
            if !(0.0..=1.0).contains(weight) {
                return Err(RigError::InvalidMixWeight {
                    au: *au,
                    weight: *weight,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.default_mix_weight) {
            return Err(RigError::InvalidMixWeight {
                au: 0,
                weight: self.default_mix_weight,
            });
        }
        for (au, bindings) in &self.au_to_bones {
            for b in bindings {
                let finite = b.scale.is_finite()
                    && b.max_degrees.map_or(true, f32::is_finite)
                    && b.max_units.map_or(true, f32::is_finite);
                if !finite {
                    return Err(RigError::NonFiniteBinding {
                        au: *au,
                        bone: b.bone.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Every semantic bone key the profile mentions, in first-mention order:
    /// declared bone nodes, then binding bones, then composite bones.
    pub fn bone_keys(&self) -> Vec<String> {
        let mut keys: IndexMap<String, ()> = IndexMap::new();
        for k in self.bone_nodes.keys() {
            keys.insert(k.clone(), ());
        }
        for bindings in self.au_to_bones.values() {
            for b in bindings {
                keys.insert(b.bone.clone(), ());
            }
        }
        for cr in &self.composite_rotations {
            keys.insert(cr.bone.clone(), ());
        }
        keys.into_keys().collect()
    }

    pub fn composite_for(&self, bone: &str) -> Option<&CompositeRotation> {
        self.composite_rotations.iter().find(|cr| cr.bone == bone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "name": "mini",
        "auToMorphs": { "12": { "left": ["Smile_L"], "right": ["Smile_R"] } },
        "auToBones": { "51": [{ "bone": "HEAD", "channel": "ry", "maxDegrees": 30 }] },
        "compositeRotations": [
            { "bone": "HEAD", "yaw": { "pair": [51, 52], "axis": "ry" } },
            { "bone": "JAW", "pitch": { "maxOf": [25, 26, 27], "axis": "rx", "flip": true } }
        ]
    }"#;

    #[test]
    fn parses_axis_sources_and_defaults() {
        let p = Profile::from_json(MINIMAL).unwrap();
        assert_eq!(p.jaw_au, 26);
        assert_eq!(p.default_mix_weight, 0.5);
        assert_eq!(p.au_to_bones[&51][0].scale, 1.0);
        let head = p.composite_for("HEAD").unwrap();
        assert_eq!(head.yaw.as_ref().unwrap().source, AxisSource::Pair([51, 52]));
        let jaw = p.composite_for("JAW").unwrap();
        let pitch = jaw.pitch.as_ref().unwrap();
        assert_eq!(pitch.source, AxisSource::MaxOf(vec![25, 26, 27]));
        assert!(pitch.flip);
    }

    #[test]
    fn rejects_translation_channel_in_composite() {
        let json = r#"{ "compositeRotations": [
            { "bone": "HEAD", "yaw": { "pair": [51, 52], "axis": "tx" } }
        ] }"#;
        assert!(matches!(
            Profile::from_json(json),
            Err(RigError::NonRotationAxis { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_mix_weight() {
        let json = r#"{ "auMixWeights": { "51": 1.5 } }"#;
        assert!(matches!(
            Profile::from_json(json),
            Err(RigError::InvalidMixWeight { au: 51, .. })
        ));
    }

    #[test]
    fn bone_keys_are_deduplicated_in_mention_order() {
        let p = Profile::from_json(MINIMAL).unwrap();
        assert_eq!(p.bone_keys(), vec!["HEAD".to_string(), "JAW".to_string()]);
    }

    #[test]
    fn round_trips_through_json() {
        let p = Profile::from_json(MINIMAL).unwrap();
        let back = Profile::from_json(&p.to_json().unwrap()).unwrap();
        assert_eq!(p, back);
    }
}

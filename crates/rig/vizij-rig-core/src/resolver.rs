//! Mapping resolver: profile lookups plus cached semantic-bone resolution.
//!
//! Bones are resolved against a `RigScene` once (`bind_scene`), capturing each
//! node's base transform. All later bone output is expressed relative to that
//! snapshot. Resolution order for a semantic key:
//! 1. exact node name (rule `name`, else the key itself)
//! 2. `bonePrefix + name + boneSuffix`
//! 3. numbered-duplicate match (`Name.001`, `Name_01`, `Name (1)`), case-insensitive
//! 4. declared candidates, in order
//!
//! An unresolved bone is logged once and cached as missing; callers treat it as a
//! silent no-op.

use hashbrown::HashMap;
use vizij_face_api::{Quat, Vec3};

use crate::profile::{BoneBinding, MorphSet, Profile};
use crate::scene::{NodeSnapshot, RigScene};

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedBone {
    pub key: String,
    pub node: String,
    pub base_position: Vec3,
    pub base_rotation: Quat,
}

impl ResolvedBone {
    fn new(key: &str, node: String, snap: NodeSnapshot) -> Self {
        Self {
            key: key.to_string(),
            node,
            base_position: snap.position,
            base_rotation: snap.rotation,
        }
    }
}

/// Outcome of binding a profile against a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindReport {
    pub resolved: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug)]
pub struct MappingResolver {
    profile: Profile,
    /// Cached resolutions; `None` marks a key already reported missing.
    bones: HashMap<String, Option<ResolvedBone>>,
    empty_morphs: MorphSet,
}

impl MappingResolver {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            bones: HashMap::new(),
            empty_morphs: MorphSet::default(),
        }
    }

    #[inline]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Swap the active profile, dropping every cached bone and re-resolving
    /// against `scene`.
    pub fn set_profile(&mut self, profile: Profile, scene: &dyn RigScene) -> BindReport {
        log::debug!(
            "rig: profile switch '{}' -> '{}'",
            self.profile.name,
            profile.name
        );
        self.profile = profile;
        self.bones.clear();
        self.bind_scene(scene)
    }

    /// Resolve every bone key the profile mentions.
    pub fn bind_scene(&mut self, scene: &dyn RigScene) -> BindReport {
        let mut report = BindReport::default();
        for key in self.profile.bone_keys() {
            match self.resolve_bone_in(&key, scene) {
                Some(_) => report.resolved.push(key),
                None => report.missing.push(key),
            }
        }
        report
    }

    /// Cached resolution for a semantic key; `None` when unresolved or never bound.
    #[inline]
    pub fn resolve_bone(&self, key: &str) -> Option<&ResolvedBone> {
        self.bones.get(key).and_then(Option::as_ref)
    }

    /// Resolve a semantic key against the scene, caching the result either way.
    pub fn resolve_bone_in(&mut self, key: &str, scene: &dyn RigScene) -> Option<&ResolvedBone> {
        if !self.bones.contains_key(key) {
            let found = find_node(&self.profile, key, scene);
            match &found {
                Some(b) => log::debug!("rig: bone '{key}' -> node '{}'", b.node),
                None => log::warn!("rig: no scene node for semantic bone '{key}'"),
            }
            self.bones.insert(key.to_string(), found);
        }
        self.resolve_bone(key)
    }

    /// Morph names for an AU; an empty set when unmapped.
    pub fn resolve_morphs(&self, au: u32) -> &MorphSet {
        self.profile
            .au_to_morphs
            .get(&au)
            .unwrap_or(&self.empty_morphs)
    }

    pub fn resolve_bone_bindings(&self, au: u32) -> &[BoneBinding] {
        self.profile
            .au_to_bones
            .get(&au)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when the AU drives both morphs and bones.
    pub fn is_mixed(&self, au: u32) -> bool {
        !self.resolve_morphs(au).is_empty() && !self.resolve_bone_bindings(au).is_empty()
    }

    /// Blend ratio between bone and morph contribution (0 = morph only, 1 = bone only).
    pub fn mix_weight(&self, au: u32) -> f32 {
        self.profile
            .au_mix_weights
            .get(&au)
            .copied()
            .unwrap_or(self.profile.default_mix_weight)
    }

    /// Multiplier applied to the AU's morph contribution.
    pub fn morph_share(&self, au: u32) -> f32 {
        if self.is_mixed(au) {
            1.0 - self.mix_weight(au)
        } else {
            1.0
        }
    }

    /// Multiplier applied to the AU's bone contribution.
    pub fn bone_share(&self, au: u32) -> f32 {
        if self.is_mixed(au) {
            self.mix_weight(au)
        } else {
            1.0
        }
    }

    pub fn viseme_count(&self) -> usize {
        self.profile.viseme_keys.len()
    }

    pub fn viseme_morph(&self, index: u32) -> Option<&str> {
        self.profile
            .viseme_keys
            .get(index as usize)
            .map(String::as_str)
    }

    pub fn jaw_au(&self) -> u32 {
        self.profile.jaw_au
    }
}

fn find_node(profile: &Profile, key: &str, scene: &dyn RigScene) -> Option<ResolvedBone> {
    let rule = profile.bone_nodes.get(key);
    let name = rule
        .and_then(|r| r.name.as_deref())
        .unwrap_or(key)
        .to_string();

    if let Some(snap) = scene.node(&name) {
        return Some(ResolvedBone::new(key, name, snap));
    }

    let affixed = format!("{}{}{}", profile.bone_prefix, name, profile.bone_suffix);
    if affixed != name {
        if let Some(snap) = scene.node(&affixed) {
            return Some(ResolvedBone::new(key, affixed, snap));
        }
    }

    for node_name in scene.node_names() {
        let stem = strip_duplicate_suffix(&node_name);
        if stem.eq_ignore_ascii_case(&name) || stem.eq_ignore_ascii_case(&affixed) {
            if let Some(snap) = scene.node(&node_name) {
                return Some(ResolvedBone::new(key, node_name, snap));
            }
        }
    }

    for candidate in rule.map(|r| r.candidates.as_slice()).unwrap_or(&[]) {
        if let Some(snap) = scene.node(candidate) {
            return Some(ResolvedBone::new(key, candidate.clone(), snap));
        }
    }
    None
}

/// Strip an exporter-added duplicate counter: `.001`, `_01`, ` 2`, ` (1)`.
fn strip_duplicate_suffix(name: &str) -> &str {
    if let Some(open) = name.rfind(" (") {
        let inner = &name[open + 2..];
        if let Some(digits) = inner.strip_suffix(')') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return &name[..open];
            }
        }
    }
    let trimmed = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.len() < name.len() {
        if let Some(stem) = trimmed
            .strip_suffix('.')
            .or_else(|| trimmed.strip_suffix('_'))
            .or_else(|| trimmed.strip_suffix(' '))
        {
            if !stem.is_empty() {
                return stem;
            }
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_common_duplicate_counters() {
        assert_eq!(strip_duplicate_suffix("Head.001"), "Head");
        assert_eq!(strip_duplicate_suffix("Head_01"), "Head");
        assert_eq!(strip_duplicate_suffix("Head (2)"), "Head");
        assert_eq!(strip_duplicate_suffix("Spine01"), "Spine01");
        assert_eq!(strip_duplicate_suffix("Eye_L"), "Eye_L");
        assert_eq!(strip_duplicate_suffix(".001"), ".001");
    }
}

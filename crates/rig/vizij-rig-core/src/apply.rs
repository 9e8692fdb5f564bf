//! Rig applier: one pass from the value table to a `RigWriteBatch`.
//!
//! - AU values fan out to their morph sets (scaled by the morph share of mixed AUs)
//! - viseme values map to the profile's viseme morph keys
//! - raw morph targets pass through
//! - bones come from the composite composer
//!
//! When several channels land on the same morph name the strongest wins.

use indexmap::IndexMap;
use vizij_face_api::{RigWriteBatch, TargetKey, TargetValueTable};

use crate::composite::CompositeComposer;
use crate::resolver::MappingResolver;

#[derive(Debug, Default, Clone, Copy)]
pub struct RigApplier {
    composer: CompositeComposer,
}

impl RigApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn composer(&self) -> &CompositeComposer {
        &self.composer
    }

    /// Morph pass only, in deterministic (sorted key) order.
    pub fn morphs(&self, resolver: &MappingResolver, table: &TargetValueTable, out: &mut RigWriteBatch) {
        let mut entries: Vec<(&TargetKey, f32)> = table.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut morphs: IndexMap<String, f32> = IndexMap::new();
        let mut push = |name: &str, value: f32| {
            let slot = morphs.entry(name.to_string()).or_insert(f32::NEG_INFINITY);
            if value > *slot {
                *slot = value;
            }
        };

        for (key, value) in entries {
            match key {
                TargetKey::Au(au) => {
                    let share = resolver.morph_share(*au);
                    let v = value.max(0.0) * share;
                    for name in resolver.resolve_morphs(*au).iter() {
                        push(name, v);
                    }
                }
                TargetKey::Viseme(index) => match resolver.viseme_morph(*index) {
                    Some(name) => push(name, value.max(0.0)),
                    None => log::debug!("rig: viseme index {index} has no morph key"),
                },
                TargetKey::Morph(name) => push(name, value.max(0.0)),
            }
        }

        for (name, value) in morphs {
            out.push_morph(name, value);
        }
    }

    /// Full frame: morphs, then bones.
    pub fn build(&self, resolver: &MappingResolver, table: &TargetValueTable) -> RigWriteBatch {
        let mut out = RigWriteBatch::new();
        self.morphs(resolver, table, &mut out);
        self.composer.compose(resolver, table, &mut out);
        out
    }
}

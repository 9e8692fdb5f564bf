//! Target value table: the single mutable store of channel values for one face.
//!
//! Only the curve scheduler and the transition engine write into it, both inside
//! the fixed per-tick order owned by the orchestrator. Values persist between ticks
//! (a channel keeps its last written value until something writes it again).
//! As JSON the table is an object keyed by the channel string (`"au:12"`).

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::target::TargetKey;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TargetValueTable {
    values: HashMap<TargetKey, f32>,
}

impl TargetValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set(&mut self, key: TargetKey, value: f32) {
        self.values.insert(key, value);
    }

    #[inline]
    pub fn get(&self, key: &TargetKey) -> Option<f32> {
        self.values.get(key).copied()
    }

    /// Value of a channel, treating unwritten channels as 0.
    #[inline]
    pub fn value(&self, key: &TargetKey) -> f32 {
        self.get(key).unwrap_or(0.0)
    }

    #[inline]
    pub fn au(&self, id: u32) -> f32 {
        self.value(&TargetKey::Au(id))
    }

    #[inline]
    pub fn set_au(&mut self, id: u32, value: f32) {
        self.set(TargetKey::Au(id), value);
    }

    /// Signed continuum value `pos - neg`, each side clamped to [0,1] first.
    pub fn continuum(&self, negative: u32, positive: u32) -> f32 {
        self.au(positive).clamp(0.0, 1.0) - self.au(negative).clamp(0.0, 1.0)
    }

    pub fn remove(&mut self, key: &TargetKey) -> Option<f32> {
        self.values.remove(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TargetKey, f32)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    /// All written AU channels, sorted by id for deterministic application.
    pub fn aus(&self) -> Vec<(u32, f32)> {
        let mut out: Vec<(u32, f32)> = self
            .values
            .iter()
            .filter_map(|(k, v)| match k {
                TargetKey::Au(id) => Some((*id, *v)),
                _ => None,
            })
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_channels_read_as_zero() {
        let table = TargetValueTable::new();
        assert_eq!(table.au(12), 0.0);
        assert_eq!(table.get(&TargetKey::viseme(3)), None);
    }

    #[test]
    fn continuum_clamps_each_side_before_subtracting() {
        let mut table = TargetValueTable::new();
        table.set_au(61, 0.25);
        table.set_au(62, 1.7);
        assert!((table.continuum(61, 62) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn aus_are_sorted() {
        let mut table = TargetValueTable::new();
        table.set_au(26, 0.5);
        table.set_au(1, 0.2);
        table.set(TargetKey::viseme(2), 0.9);
        assert_eq!(table.aus(), vec![(1, 0.2), (26, 0.5)]);
    }

    #[test]
    fn json_uses_string_keys() {
        let mut table = TargetValueTable::new();
        table.set_au(12, 0.5);
        table.set(TargetKey::viseme(3), 0.25);
        table.set(TargetKey::morph("Jaw_Open"), 1.0);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["values"]["au:12"], 0.5);
        assert_eq!(json["values"]["viseme:3"], 0.25);

        let back: TargetValueTable = serde_json::from_value(json).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back.au(12), 0.5);
        assert_eq!(back.value(&TargetKey::morph("Jaw_Open")), 1.0);
    }
}

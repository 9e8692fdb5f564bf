//! Target keys: the identity of one channel in the shared value space.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// One addressable channel written by the scheduler or the transition engine.
///
/// The renderer never sees these directly; the rig applier resolves AU ids and
/// viseme indices into morph names and bone writes first.
///
/// Serialized as its `au:N` / `viseme:N` / `morph:X` string, so it also works as a
/// JSON map key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKey {
    /// Action Unit id.
    Au(u32),
    /// Viseme index into the profile's viseme key list.
    Viseme(u32),
    /// A morph target addressed by name, bypassing AU mapping.
    Morph(String),
}

impl TargetKey {
    #[inline]
    pub fn au(id: u32) -> Self {
        TargetKey::Au(id)
    }

    #[inline]
    pub fn viseme(index: u32) -> Self {
        TargetKey::Viseme(index)
    }

    pub fn morph(name: impl Into<String>) -> Self {
        TargetKey::Morph(name.into())
    }

    pub fn as_au(&self) -> Option<u32> {
        match self {
            TargetKey::Au(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKey::Au(id) => write!(f, "au:{id}"),
            TargetKey::Viseme(idx) => write!(f, "viseme:{idx}"),
            TargetKey::Morph(name) => write!(f, "morph:{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid target key '{0}' (expected au:<id>, viseme:<index> or morph:<name>)")]
pub struct ParseTargetKeyError(pub String);

impl FromStr for TargetKey {
    type Err = ParseTargetKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTargetKeyError(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(err)?;
        match kind.trim().to_ascii_lowercase().as_str() {
            "au" => rest.trim().parse().map(TargetKey::Au).map_err(|_| err()),
            "viseme" => rest.trim().parse().map(TargetKey::Viseme).map_err(|_| err()),
            "morph" if !rest.is_empty() => Ok(TargetKey::Morph(rest.to_string())),
            _ => Err(err()),
        }
    }
}

impl Serialize for TargetKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TargetKey {
    fn deserialize<D>(deserializer: D) -> Result<TargetKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

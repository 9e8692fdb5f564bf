//! Shared JSON fixtures for the face crates.
//!
//! Fixtures live under the workspace `fixtures/` directory and are listed in
//! `fixtures/manifest.json` by kind (`profiles`, `snippets`, `scenes`).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    profiles: HashMap<String, String>,
    snippets: HashMap<String, String>,
    #[serde(default)]
    scenes: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

macro_rules! fixture_kind {
    ($module:ident, $field:ident, $label:literal) => {
        pub mod $module {
            use super::*;

            pub fn keys() -> Vec<String> {
                let mut keys: Vec<String> = MANIFEST.$field.keys().cloned().collect();
                keys.sort();
                keys
            }

            pub fn json(name: &str) -> Result<String> {
                let rel = lookup(&MANIFEST.$field, $label, name)?;
                read_to_string(rel)
            }

            pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
                let rel = lookup(&MANIFEST.$field, $label, name)?;
                super::load_json(rel)
            }

            pub fn path(name: &str) -> Result<PathBuf> {
                let rel = lookup(&MANIFEST.$field, $label, name)?;
                Ok(resolve_path(rel))
            }
        }
    };
}

fixture_kind!(profiles, profiles, "profile");
fixture_kind!(snippets, snippets, "snippet");
fixture_kind!(scenes, scenes, "scene");

/// Node listing used by scene fixtures: name → position / rotation.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneNode {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "identity")]
    pub rotation: [f32; 4],
}

fn identity() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// Load a scene fixture as an ordered node list.
pub fn scene_nodes(name: &str) -> Result<Vec<SceneNode>> {
    scenes::load(name)
}

//! Snippet authoring format (the interchange shape external tooling writes).
//!
//! ```json
//! {
//!   "name": "smile",
//!   "curves": { "12": [{ "time": 0.0, "intensity": 0.0 }, { "time": 0.4, "intensity": 0.9 }] },
//!   "loop": false,
//!   "snippetCategory": "auSnippet",
//!   "snippetPriority": 10,
//!   "snippetPlaybackRate": 1.0,
//!   "snippetIntensityScale": 1.0
//! }
//! ```
//!
//! Curve order is preserved. Parsed documents are validated the same way
//! `CurveScheduler::schedule` validates them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SnippetParseError;
use crate::snippet::{CurveSpec, Keyframe, SnippetCategory, SnippetSpec};

fn one() -> f32 {
    1.0
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    curves: IndexMap<String, Vec<Keyframe>>,
    #[serde(default, rename = "loop")]
    looping: bool,
    #[serde(default)]
    snippet_category: SnippetCategory,
    #[serde(default)]
    snippet_priority: i32,
    #[serde(default = "one")]
    snippet_playback_rate: f32,
    #[serde(default = "one")]
    snippet_intensity_scale: f32,
}

/// Parse an authoring document; its `name` field is required.
pub fn parse_snippet_json(s: &str) -> Result<SnippetSpec, SnippetParseError> {
    parse(s, None)
}

/// Parse an authoring document stored under `name` (e.g. a library key).
/// `name` takes precedence over the document's own name.
pub fn parse_snippet_json_named(s: &str, name: &str) -> Result<SnippetSpec, SnippetParseError> {
    parse(s, Some(name))
}

fn parse(s: &str, name: Option<&str>) -> Result<SnippetSpec, SnippetParseError> {
    let stored: StoredSnippet = serde_json::from_str(s)?;
    let name = name
        .map(str::to_string)
        .or(stored.name)
        .filter(|n| !n.is_empty())
        .ok_or(SnippetParseError::MissingName)?;

    let spec = SnippetSpec {
        name,
        category: stored.snippet_category,
        priority: stored.snippet_priority,
        playback_rate: stored.snippet_playback_rate,
        intensity_scale: stored.snippet_intensity_scale,
        looping: stored.looping,
        curves: stored
            .curves
            .into_iter()
            .map(|(id, keys)| CurveSpec { id, keys })
            .collect(),
    };
    spec.compile_curves()?;
    Ok(spec)
}

/// Export to the authoring format.
pub fn to_authoring_json(spec: &SnippetSpec) -> Result<String, SnippetParseError> {
    let stored = StoredSnippet {
        name: Some(spec.name.clone()),
        curves: spec
            .curves
            .iter()
            .map(|c| (c.id.clone(), c.keys.clone()))
            .collect(),
        looping: spec.looping,
        snippet_category: spec.category,
        snippet_priority: spec.priority,
        snippet_playback_rate: spec.playback_rate,
        snippet_intensity_scale: spec.intensity_scale,
    };
    Ok(serde_json::to_string_pretty(&stored)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;

    #[test]
    fn defaults_fill_missing_metadata() {
        let spec = parse_snippet_json_named(
            r#"{ "curves": { "1": [{ "time": 0.0, "intensity": 0.5 }] } }"#,
            "brow",
        )
        .unwrap();
        assert_eq!(spec.name, "brow");
        assert_eq!(spec.category, SnippetCategory::AuSnippet);
        assert_eq!(spec.priority, 0);
        assert_eq!(spec.playback_rate, 1.0);
        assert!(!spec.looping);
    }

    #[test]
    fn missing_name_is_an_error() {
        let err = parse_snippet_json(r#"{ "curves": { "1": [{ "time": 0.0, "intensity": 0.5 }] } }"#)
            .unwrap_err();
        assert!(matches!(err, SnippetParseError::MissingName));
    }

    #[test]
    fn curve_order_is_preserved() {
        let spec = parse_snippet_json(
            r#"{ "name": "o", "curves": {
                "9": [{ "time": 0.0, "intensity": 0.1 }],
                "2": [{ "time": 0.0, "intensity": 0.2 }],
                "au:5": [{ "time": 0.0, "intensity": 0.3 }]
            } }"#,
        )
        .unwrap();
        let ids: Vec<&str> = spec.curves.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["9", "2", "au:5"]);
    }

    #[test]
    fn empty_curves_are_rejected() {
        let err = parse_snippet_json(r#"{ "name": "x", "curves": {} }"#).unwrap_err();
        assert!(matches!(
            err,
            SnippetParseError::Invalid(ScheduleError::EmptyCurveSet { .. })
        ));
    }
}

//! Snippet data model: a named bundle of keyframe curves plus playback metadata.
//!
//! Producers describe a snippet with `SnippetSpec`; the scheduler compiles it into
//! a runtime `Snippet` (parsed curve targets, computed duration, playback state).

use std::fmt;

use serde::{Deserialize, Serialize};
use vizij_face_api::TargetKey;

use crate::error::ScheduleError;
use crate::ids::SnippetId;

/// Producer self-description. Only affects how plain numeric curve ids are read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnippetCategory {
    #[default]
    AuSnippet,
    VisemeSnippet,
    Combined,
    Prosodic,
    EyeTracking,
    HeadTracking,
    EyeHeadTracking,
    Custom,
}

impl SnippetCategory {
    /// True when a plain numeric curve id names a viseme index rather than an AU.
    #[inline]
    pub fn numeric_is_viseme(self) -> bool {
        matches!(self, SnippetCategory::VisemeSnippet | SnippetCategory::Combined)
    }
}

/// One keyframe; `time` in seconds from snippet start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub intensity: f32,
}

impl Keyframe {
    #[inline]
    pub const fn new(time: f32, intensity: f32) -> Self {
        Self { time, intensity }
    }
}

/// What a curve writes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CurveTarget {
    Single(TargetKey),
    /// Signed axis over two AUs: negative samples drive `negative`, positive drive `positive`.
    Continuum { negative: u32, positive: u32 },
}

impl CurveTarget {
    /// Parse an authoring curve id.
    ///
    /// - `"12"`: AU 12, or viseme 12 for viseme/combined snippets
    /// - `"au:12"`, `"viseme:3"`, `"morph:Name"`: explicit target
    /// - `"61:62"`: continuum pair (negative AU, positive AU)
    pub fn parse(id: &str, category: SnippetCategory) -> Option<Self> {
        let id = id.trim();
        if let Ok(n) = id.parse::<u32>() {
            let key = if category.numeric_is_viseme() {
                TargetKey::Viseme(n)
            } else {
                TargetKey::Au(n)
            };
            return Some(CurveTarget::Single(key));
        }
        if let Ok(key) = id.parse::<TargetKey>() {
            return Some(CurveTarget::Single(key));
        }
        let (neg, pos) = id.split_once(':')?;
        Some(CurveTarget::Continuum {
            negative: neg.trim().parse().ok()?,
            positive: pos.trim().parse().ok()?,
        })
    }

    #[inline]
    pub fn is_continuum(&self) -> bool {
        matches!(self, CurveTarget::Continuum { .. })
    }
}

impl fmt::Display for CurveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveTarget::Single(key) => write!(f, "{key}"),
            CurveTarget::Continuum { negative, positive } => write!(f, "{negative}:{positive}"),
        }
    }
}

/// Authoring-side curve: the id as written plus its keys.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSpec {
    pub id: String,
    pub keys: Vec<Keyframe>,
}

/// Producer-facing snippet description handed to `CurveScheduler::schedule`.
#[derive(Clone, Debug, PartialEq)]
pub struct SnippetSpec {
    pub name: String,
    pub category: SnippetCategory,
    pub priority: i32,
    pub playback_rate: f32,
    pub intensity_scale: f32,
    pub looping: bool,
    pub curves: Vec<CurveSpec>,
}

impl SnippetSpec {
    pub fn new(name: impl Into<String>, category: SnippetCategory) -> Self {
        Self {
            name: name.into(),
            category,
            priority: 0,
            playback_rate: 1.0,
            intensity_scale: 1.0,
            looping: false,
            curves: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_playback_rate(mut self, rate: f32) -> Self {
        self.playback_rate = rate;
        self
    }

    pub fn with_intensity_scale(mut self, scale: f32) -> Self {
        self.intensity_scale = scale;
        self
    }

    pub fn with_curve(mut self, id: impl Into<String>, keys: Vec<Keyframe>) -> Self {
        self.curves.push(CurveSpec {
            id: id.into(),
            keys,
        });
        self
    }

    /// Largest keyframe time over every curve (0 when there are no keys).
    pub fn duration(&self) -> f32 {
        self.curves
            .iter()
            .flat_map(|c| c.keys.iter())
            .map(|k| k.time)
            .fold(0.0f32, f32::max)
    }

    /// Check structure and parse every curve id.
    pub fn compile_curves(&self) -> Result<Vec<Curve>, ScheduleError> {
        let name = || self.name.clone();
        if self.curves.is_empty() {
            return Err(ScheduleError::EmptyCurveSet { name: name() });
        }
        if !self.playback_rate.is_finite() {
            return Err(ScheduleError::NonFiniteParameter {
                name: name(),
                field: "playback rate",
            });
        }
        if !self.intensity_scale.is_finite() {
            return Err(ScheduleError::NonFiniteParameter {
                name: name(),
                field: "intensity scale",
            });
        }

        let mut out = Vec::with_capacity(self.curves.len());
        for spec in &self.curves {
            let curve = || spec.id.clone();
            if spec.keys.is_empty() {
                return Err(ScheduleError::EmptyCurve {
                    name: name(),
                    curve: curve(),
                });
            }
            let mut last = f32::NEG_INFINITY;
            for (index, k) in spec.keys.iter().enumerate() {
                if !k.time.is_finite() || !k.intensity.is_finite() {
                    return Err(ScheduleError::NonFiniteKey {
                        name: name(),
                        curve: curve(),
                        index,
                    });
                }
                if k.time < last {
                    return Err(ScheduleError::UnsortedKeys {
                        name: name(),
                        curve: curve(),
                        index,
                    });
                }
                last = k.time;
            }
            let target = CurveTarget::parse(&spec.id, self.category).ok_or_else(|| {
                ScheduleError::InvalidCurveId {
                    name: name(),
                    curve: curve(),
                }
            })?;
            out.push(Curve {
                id: spec.id.clone(),
                target,
                keys: spec.keys.clone(),
            });
        }
        Ok(out)
    }
}

/// Compiled curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub id: String,
    pub target: CurveTarget,
    pub keys: Vec<Keyframe>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnippetState {
    /// Accepted, becomes `Playing` at the start of the next tick.
    Scheduled,
    Playing,
    /// Holds its current time and keeps contributing the held sample.
    Paused,
    /// Non-looping snippet reached its end; no longer contributes.
    Completed,
}

/// Runtime snippet owned by the scheduler.
#[derive(Clone, Debug)]
pub struct Snippet {
    pub id: SnippetId,
    pub name: String,
    pub category: SnippetCategory,
    pub priority: i32,
    pub playback_rate: f32,
    pub intensity_scale: f32,
    pub looping: bool,
    /// Max keyframe time over every curve, fixed at creation.
    pub duration: f32,
    pub curves: Vec<Curve>,
    /// Local time in seconds.
    pub current_time: f32,
    pub state: SnippetState,
    /// Set when the snippet completes during the current tick so its final sample still lands.
    pub(crate) finished_this_tick: bool,
}

impl Snippet {
    pub(crate) fn compile(id: SnippetId, spec: SnippetSpec) -> Result<Self, ScheduleError> {
        let curves = spec.compile_curves()?;
        let duration = spec.duration();
        Ok(Self {
            id,
            name: spec.name,
            category: spec.category,
            priority: spec.priority,
            playback_rate: spec.playback_rate,
            intensity_scale: spec.intensity_scale,
            looping: spec.looping,
            duration,
            curves,
            current_time: 0.0,
            state: SnippetState::Scheduled,
            finished_this_tick: false,
        })
    }

    #[inline]
    pub fn seq(&self) -> u64 {
        self.id.seq()
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state == SnippetState::Completed
    }

    /// Whether this snippet's samples take part in conflict resolution this tick.
    #[inline]
    pub(crate) fn contributes(&self) -> bool {
        match self.state {
            SnippetState::Playing | SnippetState::Paused => true,
            SnippetState::Completed => self.finished_this_tick,
            SnippetState::Scheduled => false,
        }
    }

    /// Rebuild the authoring description, e.g. for export.
    pub fn to_spec(&self) -> SnippetSpec {
        SnippetSpec {
            name: self.name.clone(),
            category: self.category,
            priority: self.priority,
            playback_rate: self.playback_rate,
            intensity_scale: self.intensity_scale,
            looping: self.looping,
            curves: self
                .curves
                .iter()
                .map(|c| CurveSpec {
                    id: c.id.clone(),
                    keys: c.keys.clone(),
                })
                .collect(),
        }
    }
}

//! Viseme and jaw curve synthesis for one word.
//!
//! `plan_word` lays phonemes end to end on a millisecond timeline. `word_snippet`
//! turns that plan into a `Combined` snippet: one curve per viseme channel (plain
//! numeric ids) plus a jaw curve on the profile's jaw AU.

use indexmap::IndexMap;
use vizij_animation_core::{Keyframe, SnippetCategory, SnippetSpec, TargetKey, TargetValueTable};

use crate::config::LipSyncConfig;
use crate::phonemes::Phoneme;
use crate::visemes::{map_phoneme_to_viseme, Viseme};

pub const MIN_SPEECH_RATE: f32 = 0.1;
/// Events at least this long get an extra held key at their midpoint.
const MID_KEY_MIN_MS: f32 = 120.0;

pub const NEUTRAL_SNIPPET: &str = "lipsync:neutral";

/// One phoneme on the word timeline. `viseme` is `None` for pauses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisemeEvent {
    pub viseme: Option<Viseme>,
    pub offset_ms: f32,
    pub duration_ms: f32,
    pub jaw: f32,
}

impl VisemeEvent {
    #[inline]
    pub fn end_ms(&self) -> f32 {
        self.offset_ms + self.duration_ms
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordPlan {
    pub phonemes: Vec<Phoneme>,
    pub events: Vec<VisemeEvent>,
    pub total_ms: f32,
}

pub fn plan_word(phonemes: &[Phoneme], rate: f32) -> WordPlan {
    let rate = if rate.is_finite() {
        rate.max(MIN_SPEECH_RATE)
    } else {
        1.0
    };
    let mut offset = 0.0f32;
    let events = phonemes
        .iter()
        .map(|p| {
            let mapping = map_phoneme_to_viseme(*p);
            let duration_ms = mapping.base_ms / rate;
            let ev = VisemeEvent {
                viseme: mapping.viseme,
                offset_ms: offset,
                duration_ms,
                jaw: mapping.jaw,
            };
            offset += duration_ms;
            ev
        })
        .collect();
    WordPlan {
        phonemes: phonemes.to_vec(),
        events,
        total_ms: offset,
    }
}

#[inline]
fn secs(ms: f32) -> f32 {
    ms / 1000.0
}

fn push_key(keys: &mut Vec<Keyframe>, time_ms: f32, intensity: f32) {
    keys.push(Keyframe::new(secs(time_ms), intensity));
}

/// Build the per-word snippet.
pub fn word_snippet(
    name: impl Into<String>,
    plan: &WordPlan,
    cfg: &LipSyncConfig,
    jaw_au: u32,
) -> SnippetSpec {
    let peak = cfg.intensity.max(0.0);
    let sustain = peak * cfg.sustain_level.clamp(0.0, 1.0);
    let attack_ratio = cfg.attack_ratio.clamp(0.10, 0.25);
    let release_ratio = cfg.release_ratio.clamp(0.10, 0.40);

    let mut visemes: IndexMap<Viseme, Vec<Keyframe>> = IndexMap::new();
    let mut prev: Option<Viseme> = None;
    for ev in &plan.events {
        let Some(viseme) = ev.viseme else {
            prev = None;
            continue;
        };
        let start = ev.offset_ms;
        let end = ev.end_ms();
        let attack = ev.duration_ms * attack_ratio;
        let release = ev.duration_ms * release_ratio;

        let keys = visemes.entry(viseme).or_default();
        if cfg.coarticulation && prev == Some(viseme) {
            // carry the previous sustain straight into this event
            keys.pop();
        } else {
            push_key(keys, start, 0.0);
        }
        push_key(keys, start + attack, peak);
        if ev.duration_ms >= MID_KEY_MIN_MS {
            push_key(keys, start + ev.duration_ms * 0.5, peak);
        }
        push_key(keys, end - release, sustain);
        push_key(keys, end, 0.0);
        prev = Some(viseme);
    }

    let jaw = jaw_keys(plan, cfg, attack_ratio, release_ratio);

    let mut spec = SnippetSpec::new(name, SnippetCategory::Combined)
        .with_priority(cfg.word_priority)
        .with_loop(false);
    for (viseme, keys) in visemes {
        spec = spec.with_curve(viseme.index().to_string(), keys);
    }
    if !jaw.is_empty() {
        spec = spec.with_curve(format!("au:{jaw_au}"), jaw);
    }

    // trailing pauses still count toward the word's duration
    let total = secs(plan.total_ms);
    match spec.curves.last_mut() {
        Some(curve) => {
            if curve.keys.last().map_or(true, |k| k.time < total) {
                curve.keys.push(Keyframe::new(total, 0.0));
            }
        }
        None => {
            spec = spec.with_curve(
                format!("au:{jaw_au}"),
                vec![Keyframe::new(0.0, 0.0), Keyframe::new(total, 0.0)],
            );
        }
    }
    spec
}

/// Jaw keys for every event whose coefficient clears the threshold. Contiguous
/// emitting events share one open segment.
fn jaw_keys(plan: &WordPlan, cfg: &LipSyncConfig, attack_ratio: f32, release_ratio: f32) -> Vec<Keyframe> {
    let emits = |ev: &VisemeEvent| ev.viseme.is_some() && ev.jaw > cfg.jaw_threshold;
    let level = |ev: &VisemeEvent| (ev.jaw * cfg.jaw_activation * cfg.intensity).clamp(0.0, 1.0);
    let sustain = cfg.sustain_level.clamp(0.0, 1.0);

    let mut keys = Vec::new();
    let mut open = false;
    for (i, ev) in plan.events.iter().enumerate() {
        if !emits(ev) {
            continue;
        }
        let v = level(ev);
        if !open {
            push_key(&mut keys, ev.offset_ms, 0.0);
            open = true;
        }
        push_key(&mut keys, ev.offset_ms + ev.duration_ms * attack_ratio, v);
        push_key(&mut keys, ev.end_ms() - ev.duration_ms * release_ratio, v * sustain);

        let continues = plan
            .events
            .get(i + 1)
            .is_some_and(|next| emits(next) && next.offset_ms <= ev.end_ms());
        if !continues {
            push_key(&mut keys, ev.end_ms(), 0.0);
            open = false;
        }
    }
    keys
}

/// Ramp every viseme channel and the jaw from their current table values to zero.
pub fn neutral_return_snippet(
    table: &TargetValueTable,
    viseme_count: usize,
    jaw_au: u32,
    cfg: &LipSyncConfig,
) -> SnippetSpec {
    let window = secs(cfg.neutral_window_ms.max(0.0));
    let ramp = |from: f32| vec![Keyframe::new(0.0, from), Keyframe::new(window, 0.0)];

    let mut spec = SnippetSpec::new(NEUTRAL_SNIPPET, SnippetCategory::Combined)
        .with_priority(cfg.neutral_priority)
        .with_loop(false);
    for i in 0..viseme_count as u32 {
        let from = table.value(&TargetKey::viseme(i));
        spec = spec.with_curve(format!("viseme:{i}"), ramp(from));
    }
    let jaw = table.value(&TargetKey::au(jaw_au));
    spec.with_curve(format!("au:{jaw_au}"), ramp(jaw))
}

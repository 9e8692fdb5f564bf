//! Gaze scheduler: turns gaze targets into eased eye and head tracking snippets.
//!
//! Each axis ramps from its live value (the scheduler's last winning sample, or the
//! previous target when nothing has been sampled yet) to the new value. Axes whose
//! live value is already within the threshold of the new value get no curve. Eyes and head are separate snippets
//! with their own category and priority; a follow delay holds the head request
//! until enough `tick` time has passed.

use vizij_animation_core::{
    CurveScheduler, Easing, Keyframe, SnippetCategory, SnippetSpec, TargetKey,
};

use crate::config::GazeConfig;
use crate::target::GazeTarget;

pub const GAZE_SNIPPET_PREFIX: &str = "gaze:";
pub const EYE_SNIPPET: &str = "gaze:eyes";
pub const HEAD_SNIPPET: &str = "gaze:head";

/// Continuum pairs as `(negative AU, positive AU)`.
pub const EYE_YAW: (u32, u32) = (61, 62);
pub const EYE_PITCH: (u32, u32) = (64, 63);
pub const HEAD_YAW: (u32, u32) = (51, 52);
pub const HEAD_PITCH: (u32, u32) = (54, 53);
pub const HEAD_ROLL: (u32, u32) = (55, 56);

#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingHead {
    target: GazeTarget,
    remaining_ms: f32,
}

#[derive(Debug, Default)]
pub struct GazeScheduler {
    cfg: GazeConfig,
    eyes: GazeTarget,
    head: GazeTarget,
    pending_head: Option<PendingHead>,
}

/// Eased ramp from `from` to `to` over `duration_s` with `steps` intervals.
pub fn ramp_keys(from: f32, to: f32, duration_s: f32, steps: u32, easing: Easing) -> Vec<Keyframe> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let p = i as f32 / steps as f32;
            Keyframe::new(duration_s * p, from + (to - from) * easing.apply(p))
        })
        .collect()
}

fn pair_id((neg, pos): (u32, u32)) -> String {
    format!("{neg}:{pos}")
}

impl GazeScheduler {
    pub fn new(cfg: GazeConfig) -> Self {
        Self {
            cfg,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &GazeConfig {
        &self.cfg
    }

    /// Last requested eye target.
    pub fn current(&self) -> GazeTarget {
        self.eyes
    }

    pub fn head_current(&self) -> GazeTarget {
        self.head
    }

    pub fn has_pending_head(&self) -> bool {
        self.pending_head.is_some()
    }

    /// Live signed value of a pair, falling back to `fallback` before the first sample.
    fn live(scheduler: &CurveScheduler, (neg, pos): (u32, u32), fallback: f32) -> f32 {
        let p = scheduler.sampled(&TargetKey::Au(pos));
        let n = scheduler.sampled(&TargetKey::Au(neg));
        match (p, n) {
            (None, None) => fallback,
            (p, n) => p.unwrap_or(0.0) - n.unwrap_or(0.0),
        }
    }

    fn axis_curve(
        &self,
        scheduler: &CurveScheduler,
        pair: (u32, u32),
        previous: f32,
        next: f32,
        duration_ms: f32,
    ) -> Option<(String, Vec<Keyframe>)> {
        // measured from the live value so an axis still ramping keeps its curve
        let from = Self::live(scheduler, pair, previous);
        if (next - from).abs() < self.cfg.threshold {
            return None;
        }
        let keys = ramp_keys(
            from,
            next,
            duration_ms.max(0.0) / 1000.0,
            self.cfg.steps,
            self.cfg.easing,
        );
        Some((pair_id(pair), keys))
    }

    /// Request a new gaze direction. Returns true when anything was scheduled or queued.
    pub fn set_target(&mut self, target: GazeTarget, scheduler: &mut CurveScheduler) -> bool {
        if !target.is_finite() {
            log::warn!("gaze: ignoring non-finite target {target:?}");
            return false;
        }
        let eyes = self.schedule_eyes(target, scheduler);

        let mut head = false;
        if self.cfg.head_enabled {
            if self.cfg.head_follow_delay_ms > 0.0 {
                self.pending_head = Some(PendingHead {
                    target,
                    remaining_ms: self.cfg.head_follow_delay_ms,
                });
                head = true;
            } else {
                self.pending_head = None;
                head = self.schedule_head(target, scheduler);
            }
        }
        eyes || head
    }

    fn schedule_eyes(&mut self, target: GazeTarget, scheduler: &mut CurveScheduler) -> bool {
        let k = self.cfg.eye_intensity;
        let (prev, next) = (self.eyes.scaled(k), target.scaled(k));
        let d = self.cfg.eye_duration_ms;
        let curves: Vec<_> = [
            self.axis_curve(scheduler, EYE_YAW, prev.x, next.x, d),
            self.axis_curve(scheduler, EYE_PITCH, prev.y, next.y, d),
        ]
        .into_iter()
        .flatten()
        .collect();
        self.eyes = target;
        self.submit(
            scheduler,
            EYE_SNIPPET,
            SnippetCategory::EyeTracking,
            self.cfg.eye_priority,
            curves,
        )
    }

    fn schedule_head(&mut self, target: GazeTarget, scheduler: &mut CurveScheduler) -> bool {
        let k = self.cfg.head_intensity;
        let (prev, next) = (self.head.scaled(k), target.scaled(k));
        let d = self.cfg.head_duration_ms;
        let curves: Vec<_> = [
            self.axis_curve(scheduler, HEAD_YAW, prev.x, next.x, d),
            self.axis_curve(scheduler, HEAD_PITCH, prev.y, next.y, d),
            self.axis_curve(scheduler, HEAD_ROLL, prev.z, next.z, d),
        ]
        .into_iter()
        .flatten()
        .collect();
        self.head = target;
        self.submit(
            scheduler,
            HEAD_SNIPPET,
            SnippetCategory::HeadTracking,
            self.cfg.head_priority,
            curves,
        )
    }

    fn submit(
        &self,
        scheduler: &mut CurveScheduler,
        name: &str,
        category: SnippetCategory,
        priority: i32,
        curves: Vec<(String, Vec<Keyframe>)>,
    ) -> bool {
        if curves.is_empty() {
            return false;
        }
        let spec = curves.into_iter().fold(
            SnippetSpec::new(name, category).with_priority(priority),
            |spec, (id, keys)| spec.with_curve(id, keys),
        );
        match scheduler.schedule(spec) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("gaze: {err}");
                false
            }
        }
    }

    /// Release a delayed head request once its follow delay has elapsed.
    pub fn tick(&mut self, dt_s: f32, scheduler: &mut CurveScheduler) {
        let Some(pending) = self.pending_head.as_mut() else {
            return;
        };
        pending.remaining_ms -= dt_s * 1000.0;
        if pending.remaining_ms <= 0.0 {
            let target = pending.target;
            self.pending_head = None;
            self.schedule_head(target, scheduler);
        }
    }

    /// Drop every gaze snippet and any queued head request.
    pub fn stop(&mut self, scheduler: &mut CurveScheduler) {
        let removed = scheduler.remove_prefixed(GAZE_SNIPPET_PREFIX);
        self.pending_head = None;
        log::debug!("gaze: stop ({removed} snippets removed)");
    }

    pub fn reset_to_neutral(&mut self, scheduler: &mut CurveScheduler) -> bool {
        self.set_target(GazeTarget::NEUTRAL, scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_is_eased_and_lands_on_target() {
        let keys = ramp_keys(0.0, 1.0, 0.2, 4, Easing::CubicOut);
        assert_eq!(keys.len(), 5);
        assert_eq!(keys[0], Keyframe::new(0.0, 0.0));
        assert!((keys[4].time - 0.2).abs() < 1e-6);
        assert!((keys[4].intensity - 1.0).abs() < 1e-6);
        // ease-out front-loads the motion
        assert!(keys[1].intensity > 0.25);
    }

    #[test]
    fn zero_steps_still_produce_a_ramp() {
        let keys = ramp_keys(0.5, -0.5, 0.1, 0, Easing::Linear);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[1].intensity, -0.5);
    }
}

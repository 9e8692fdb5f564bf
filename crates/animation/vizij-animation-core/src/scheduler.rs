//! Curve scheduler: owns the active snippets and writes per-target winners.
//!
//! Tick order inside `tick`:
//! 1. `promote`: scheduled snippets become playing
//! 2. `advance`: playing snippets move `current_time += dt * playback_rate`
//!    (looping ones wrap, others complete at `duration`)
//! 3. `apply`: sample every contributing curve, resolve conflicts, write winners
//!
//! Hosts that need a global pause call `promote` and `apply` but skip `advance`.

use std::fmt;

use vizij_face_api::{TargetKey, TargetValueTable};

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::ids::{IdCounter, SnippetId};
use crate::outputs::SchedulerEvent;
use crate::resolve::{Contribution, PriorityResolver};
use crate::sampling::{fmod, sample_curve};
use crate::snippet::{CurveTarget, Snippet, SnippetSpec, SnippetState};

type EndListener = Box<dyn FnMut(&str)>;

pub struct CurveScheduler {
    cfg: SchedulerConfig,
    ids: IdCounter,
    snippets: Vec<Snippet>,
    resolver: PriorityResolver,
    events: Vec<SchedulerEvent>,
    on_snippet_end: Option<EndListener>,
}

impl fmt::Debug for CurveScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveScheduler")
            .field("cfg", &self.cfg)
            .field("snippets", &self.snippets)
            .field("events", &self.events)
            .field("on_snippet_end", &self.on_snippet_end.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for CurveScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl CurveScheduler {
    pub fn new(cfg: SchedulerConfig) -> Self {
        Self {
            snippets: Vec::with_capacity(cfg.snippet_capacity),
            cfg,
            ids: IdCounter::default(),
            resolver: PriorityResolver::new(),
            events: Vec::new(),
            on_snippet_end: None,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    /// Validate and add a snippet. A snippet with the same name is replaced and
    /// the replacement counts as the most recent schedule.
    pub fn schedule(&mut self, spec: SnippetSpec) -> Result<SnippetId, ScheduleError> {
        let id = self.ids.snippet();
        let snippet = match Snippet::compile(id, spec) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("scheduler: rejected snippet: {e}");
                return Err(e);
            }
        };

        if let Some(pos) = self.position(&snippet.name) {
            log::debug!("scheduler: replace '{}'", snippet.name);
            self.snippets.remove(pos);
            self.events.push(SchedulerEvent::SnippetReplaced {
                name: snippet.name.clone(),
            });
        } else {
            log::debug!(
                "scheduler: schedule '{}' (priority {}, {:.3}s)",
                snippet.name,
                snippet.priority,
                snippet.duration
            );
        }
        self.snippets.push(snippet);
        Ok(id)
    }

    /// Remove by name. Missing names are a no-op.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(pos) => {
                self.snippets.remove(pos);
                log::debug!("scheduler: remove '{name}'");
                self.events.push(SchedulerEvent::SnippetRemoved {
                    name: name.to_string(),
                });
                true
            }
            None => false,
        }
    }

    pub fn remove_id(&mut self, id: SnippetId) -> bool {
        match self.snippets.iter().find(|s| s.id == id) {
            Some(s) => {
                let name = s.name.clone();
                self.remove(&name)
            }
            None => false,
        }
    }

    /// Remove every snippet whose name starts with `prefix`; returns how many went.
    pub fn remove_prefixed(&mut self, prefix: &str) -> usize {
        let names: Vec<String> = self
            .snippets
            .iter()
            .filter(|s| s.name.starts_with(prefix))
            .map(|s| s.name.clone())
            .collect();
        for name in &names {
            self.remove(name);
        }
        names.len()
    }

    /// Drop every snippet and pending event.
    pub fn clear(&mut self) {
        self.snippets.clear();
        self.resolver.begin_frame();
        self.events.clear();
    }

    /// Remove completed snippets, returning their names.
    pub fn prune_completed(&mut self) -> Vec<String> {
        let mut pruned = Vec::new();
        self.snippets.retain(|s| {
            if s.is_completed() {
                pruned.push(s.name.clone());
                false
            } else {
                true
            }
        });
        pruned
    }

    #[inline]
    fn position(&self, name: &str) -> Option<usize> {
        self.snippets.iter().position(|s| s.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Snippet> {
        self.snippets.iter_mut().find(|s| s.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn snippet_state(&self, name: &str) -> Option<SnippetState> {
        self.get(name).map(|s| s.state)
    }

    /// Names of snippets that have not completed, in schedule order.
    pub fn active_names(&self) -> Vec<&str> {
        self.snippets
            .iter()
            .filter(|s| !s.is_completed())
            .map(|s| s.name.as_str())
            .collect()
    }

    pub fn pause_snippet(&mut self, name: &str) -> bool {
        match self.get_mut(name) {
            Some(s) if matches!(s.state, SnippetState::Playing | SnippetState::Scheduled) => {
                s.state = SnippetState::Paused;
                true
            }
            _ => false,
        }
    }

    pub fn resume_snippet(&mut self, name: &str) -> bool {
        match self.get_mut(name) {
            Some(s) if s.state == SnippetState::Paused => {
                s.state = SnippetState::Playing;
                true
            }
            _ => false,
        }
    }

    /// Jump to a local time (clamped to `[0, duration]`). Seeking a completed
    /// snippet back before its end makes it play again.
    pub fn seek(&mut self, name: &str, time: f32) -> bool {
        if !time.is_finite() {
            return false;
        }
        match self.get_mut(name) {
            Some(s) => {
                s.current_time = time.clamp(0.0, s.duration);
                if s.is_completed() && s.current_time < s.duration {
                    s.state = SnippetState::Playing;
                }
                true
            }
            None => false,
        }
    }

    /// Back to time zero and playing.
    pub fn restart(&mut self, name: &str) -> bool {
        match self.get_mut(name) {
            Some(s) => {
                s.current_time = 0.0;
                s.state = SnippetState::Playing;
                s.finished_this_tick = false;
                true
            }
            None => false,
        }
    }

    pub fn set_playback_rate(&mut self, name: &str, rate: f32) -> bool {
        match self.get_mut(name) {
            Some(s) if rate.is_finite() => {
                s.playback_rate = rate;
                true
            }
            _ => false,
        }
    }

    pub fn set_intensity_scale(&mut self, name: &str, scale: f32) -> bool {
        match self.get_mut(name) {
            Some(s) if scale.is_finite() => {
                s.intensity_scale = scale;
                true
            }
            _ => false,
        }
    }

    pub fn set_loop(&mut self, name: &str, looping: bool) -> bool {
        match self.get_mut(name) {
            Some(s) => {
                s.looping = looping;
                true
            }
            None => false,
        }
    }

    /// Listener invoked once per completion, after the completing tick's advance.
    pub fn set_on_snippet_end(&mut self, listener: impl FnMut(&str) + 'static) {
        self.on_snippet_end = Some(Box::new(listener));
    }

    pub fn clear_on_snippet_end(&mut self) {
        self.on_snippet_end = None;
    }

    /// Events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<SchedulerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Last tick's winning value for `key`, if any snippet wrote it.
    pub fn sampled(&self, key: &TargetKey) -> Option<f32> {
        self.resolver.winner(key).map(|c| c.value)
    }

    /// Promote `Scheduled` snippets to `Playing`.
    pub fn promote(&mut self) {
        for s in &mut self.snippets {
            if s.state == SnippetState::Scheduled {
                s.state = SnippetState::Playing;
                self.events.push(SchedulerEvent::SnippetStarted {
                    name: s.name.clone(),
                });
            }
        }
    }

    /// Advance local time of every playing snippet by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let eps = self.cfg.completion_epsilon;
        let mut ended: Vec<String> = Vec::new();

        for s in &mut self.snippets {
            if s.state != SnippetState::Playing {
                continue;
            }
            s.current_time += dt * s.playback_rate;
            if s.looping {
                s.current_time = fmod(s.current_time, s.duration);
            } else if s.current_time >= s.duration - eps {
                s.current_time = s.duration;
                s.state = SnippetState::Completed;
                s.finished_this_tick = true;
                ended.push(s.name.clone());
            } else if s.current_time < 0.0 {
                s.current_time = 0.0;
            }
        }

        for name in ended {
            log::debug!("scheduler: '{name}' completed");
            if let Some(listener) = self.on_snippet_end.as_mut() {
                listener(&name);
            }
            self.events.push(SchedulerEvent::SnippetEnded { name });
        }
    }

    /// Sample every contributing snippet, resolve conflicts and write the winners.
    pub fn apply(&mut self, table: &mut TargetValueTable) {
        self.resolver.begin_frame();
        let band = self.cfg.sample_band;
        let continuum_band = self.cfg.continuum_band;

        for s in &self.snippets {
            if !s.contributes() {
                continue;
            }
            let t = s.current_time;
            for curve in &s.curves {
                match &curve.target {
                    CurveTarget::Single(key) => {
                        let value = sample_curve(curve, t, s.intensity_scale, band);
                        self.resolver.offer(key, contribution(s, value));
                    }
                    CurveTarget::Continuum { negative, positive } => {
                        let v = sample_curve(curve, t, s.intensity_scale, continuum_band);
                        self.resolver
                            .offer(&TargetKey::Au(*positive), contribution(s, v.max(0.0)));
                        self.resolver
                            .offer(&TargetKey::Au(*negative), contribution(s, (-v).max(0.0)));
                    }
                }
            }
        }

        self.resolver.write_to(table);
        for s in &mut self.snippets {
            s.finished_this_tick = false;
        }
    }

    /// Full scheduler tick: promote, advance, apply.
    pub fn tick(&mut self, dt: f32, table: &mut TargetValueTable) {
        self.promote();
        self.advance(dt);
        self.apply(table);
    }
}

#[inline]
fn contribution(s: &Snippet, value: f32) -> Contribution {
    Contribution {
        priority: s.priority,
        seq: s.seq(),
        value,
    }
}

//! Transition engine: one-shot eased value changes on single targets.
//!
//! At most one transition is in flight per target key. Starting another on the
//! same key cancels the old one without applying it again. Degenerate requests
//! (non-positive duration, or `from` already equal to `to`) write `to` at once and
//! hand back a handle that is already resolved.
//!
//! Handles share a completion cell with the engine, so a producer can poll
//! `is_resolved()` after any tick.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use vizij_face_api::math::lerp_f32;
use vizij_face_api::{TargetKey, TargetValueTable};

use crate::config::TransitionConfig;
use crate::ids::{IdCounter, TransitionId};
use crate::interp::Easing;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub target: TargetKey,
    pub from: f32,
    pub to: f32,
    pub duration_ms: f32,
    #[serde(default)]
    pub easing: Easing,
}

impl TransitionRequest {
    pub fn new(target: TargetKey, from: f32, to: f32, duration_ms: f32) -> Self {
        Self {
            target,
            from,
            to,
            duration_ms,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionState {
    Running,
    Paused,
    /// Reached `to`.
    Completed,
    /// Cancelled explicitly or superseded by a newer transition on the same key.
    Cancelled,
}

impl TransitionState {
    #[inline]
    pub fn is_resolved(self) -> bool {
        matches!(self, TransitionState::Completed | TransitionState::Cancelled)
    }
}

/// Caller-side view of a transition.
#[derive(Clone, Debug)]
pub struct TransitionHandle {
    id: TransitionId,
    state: Rc<Cell<TransitionState>>,
}

impl TransitionHandle {
    #[inline]
    pub fn id(&self) -> TransitionId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> TransitionState {
        self.state.get()
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.state.get().is_resolved()
    }
}

#[derive(Debug)]
struct Transition {
    id: TransitionId,
    req: TransitionRequest,
    elapsed_ms: f32,
    state: Rc<Cell<TransitionState>>,
}

impl Transition {
    fn resolve(&self, state: TransitionState) {
        self.state.set(state);
    }

    #[inline]
    fn paused(&self) -> bool {
        self.state.get() == TransitionState::Paused
    }
}

#[derive(Debug, Default)]
pub struct TransitionEngine {
    cfg: TransitionConfig,
    ids: IdCounter,
    active: Vec<Transition>,
}

impl TransitionEngine {
    pub fn new(cfg: TransitionConfig) -> Self {
        Self {
            cfg,
            ids: IdCounter::default(),
            active: Vec::new(),
        }
    }

    /// Begin a transition. Any transition already running on the same target is
    /// cancelled first.
    pub fn start(&mut self, table: &mut TargetValueTable, req: TransitionRequest) -> TransitionHandle {
        let id = self.ids.transition();
        self.cancel_target(&req.target);

        let degenerate = req.duration_ms <= 0.0
            || !req.duration_ms.is_finite()
            || (req.from - req.to).abs() < self.cfg.degenerate_epsilon;
        if degenerate {
            table.set(req.target.clone(), req.to);
            log::debug!("transition: {} set to {} immediately", req.target, req.to);
            return TransitionHandle {
                id,
                state: Rc::new(Cell::new(TransitionState::Completed)),
            };
        }

        let state = Rc::new(Cell::new(TransitionState::Running));
        self.active.push(Transition {
            id,
            req,
            elapsed_ms: 0.0,
            state: Rc::clone(&state),
        });
        TransitionHandle { id, state }
    }

    pub fn pause(&mut self, id: TransitionId) -> bool {
        match self.active.iter().find(|t| t.id == id) {
            Some(t) if !t.paused() => {
                t.state.set(TransitionState::Paused);
                true
            }
            _ => false,
        }
    }

    pub fn resume(&mut self, id: TransitionId) -> bool {
        match self.active.iter().find(|t| t.id == id) {
            Some(t) if t.paused() => {
                t.state.set(TransitionState::Running);
                true
            }
            _ => false,
        }
    }

    /// Cancel by id; unknown or finished ids are a no-op.
    pub fn cancel(&mut self, id: TransitionId) -> bool {
        match self.active.iter().position(|t| t.id == id) {
            Some(pos) => {
                let t = self.active.remove(pos);
                t.resolve(TransitionState::Cancelled);
                true
            }
            None => false,
        }
    }

    /// Cancel whatever is running on `target`.
    pub fn cancel_target(&mut self, target: &TargetKey) -> bool {
        match self.active.iter().position(|t| &t.req.target == target) {
            Some(pos) => {
                let t = self.active.remove(pos);
                log::debug!("transition: {} superseded", t.req.target);
                t.resolve(TransitionState::Cancelled);
                true
            }
            None => false,
        }
    }

    /// Cancel everything in flight.
    pub fn cancel_all(&mut self) {
        for t in self.active.drain(..) {
            t.resolve(TransitionState::Cancelled);
        }
    }

    pub fn is_active(&self, target: &TargetKey) -> bool {
        self.active.iter().any(|t| &t.req.target == target)
    }

    pub fn elapsed_ms(&self, id: TransitionId) -> Option<f32> {
        self.active.iter().find(|t| t.id == id).map(|t| t.elapsed_ms)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance every running transition by `dt` seconds and write its value.
    pub fn tick(&mut self, dt: f32, table: &mut TargetValueTable) {
        let dt_ms = dt * 1000.0;
        self.active.retain_mut(|t| {
            if t.paused() {
                return true;
            }
            t.elapsed_ms += dt_ms;
            let progress = (t.elapsed_ms / t.req.duration_ms).clamp(0.0, 1.0);
            let value = lerp_f32(t.req.from, t.req.to, t.req.easing.apply(progress));
            table.set(t.req.target.clone(), value);
            if progress >= 1.0 {
                t.resolve(TransitionState::Completed);
                false
            } else {
                true
            }
        });
    }
}

//! Idle gaze behaviour as an explicit state machine.
//!
//! States carry a timer; transitions are a static table of `(from, guard, to)`
//! rows checked in order each tick. Entering a state yields the gaze target it
//! wants, which the caller hands to `GazeScheduler::set_target`.

use serde::{Deserialize, Serialize};

use crate::target::GazeTarget;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GazeBehaviorConfig {
    /// Time spent idle before the next glance.
    pub idle_ms: f32,
    /// How long a glance is held.
    pub glance_ms: f32,
    /// Time allowed for the return to neutral before idling again.
    pub return_ms: f32,
    /// Glance directions, visited round-robin. Empty disables glancing.
    pub glances: Vec<GazeTarget>,
}

impl Default for GazeBehaviorConfig {
    fn default() -> Self {
        Self {
            idle_ms: 2500.0,
            glance_ms: 700.0,
            return_ms: 400.0,
            glances: vec![
                GazeTarget::new(0.3, 0.1, 0.0),
                GazeTarget::new(-0.3, 0.05, 0.0),
                GazeTarget::new(0.1, -0.15, 0.0),
            ],
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GazeState {
    #[default]
    Idle,
    Glance,
    Tracking,
    Returning,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Guard {
    /// A `track` request is waiting.
    TrackRequested,
    /// A `release` request is waiting.
    Released,
    /// The state's timer reached its configured delay.
    TimerElapsed,
    /// Timer elapsed and there is at least one glance to visit.
    GlanceDue,
}

struct Transition {
    from: GazeState,
    guard: Guard,
    to: GazeState,
}

const fn row(from: GazeState, guard: Guard, to: GazeState) -> Transition {
    Transition { from, guard, to }
}

use GazeState::{Glance, Idle, Returning, Tracking};

const TRANSITIONS: &[Transition] = &[
    row(Idle, Guard::TrackRequested, Tracking),
    row(Idle, Guard::GlanceDue, Glance),
    row(Glance, Guard::TrackRequested, Tracking),
    row(Glance, Guard::TimerElapsed, Returning),
    row(Tracking, Guard::TrackRequested, Tracking),
    row(Tracking, Guard::Released, Returning),
    row(Returning, Guard::TrackRequested, Tracking),
    row(Returning, Guard::TimerElapsed, Idle),
];

#[derive(Clone, Debug, Default)]
pub struct GazeBehavior {
    cfg: GazeBehaviorConfig,
    state: GazeState,
    timer_ms: f32,
    glance_cursor: usize,
    requested: Option<GazeTarget>,
    released: bool,
}

impl GazeBehavior {
    pub fn new(cfg: GazeBehaviorConfig) -> Self {
        Self {
            cfg,
            ..Default::default()
        }
    }

    #[inline]
    pub fn state(&self) -> GazeState {
        self.state
    }

    pub fn timer_ms(&self) -> f32 {
        self.timer_ms
    }

    /// Follow `target` from the next tick on.
    pub fn track(&mut self, target: GazeTarget) {
        self.requested = Some(target);
        self.released = false;
    }

    /// Stop tracking and drift back to neutral.
    pub fn release(&mut self) {
        self.requested = None;
        self.released = true;
    }

    fn delay_ms(&self, state: GazeState) -> f32 {
        match state {
            Idle => self.cfg.idle_ms,
            Glance => self.cfg.glance_ms,
            Returning => self.cfg.return_ms,
            Tracking => f32::INFINITY,
        }
    }

    fn guard_holds(&self, guard: Guard) -> bool {
        let elapsed = self.timer_ms >= self.delay_ms(self.state);
        match guard {
            Guard::TrackRequested => self.requested.is_some(),
            Guard::Released => self.released,
            Guard::TimerElapsed => elapsed,
            Guard::GlanceDue => elapsed && !self.cfg.glances.is_empty(),
        }
    }

    /// Advance timers and fire at most one transition. Returns the target to look
    /// at when a state was entered.
    pub fn tick(&mut self, dt_ms: f32) -> Option<GazeTarget> {
        self.timer_ms += dt_ms.max(0.0);

        let next = TRANSITIONS
            .iter()
            .find(|t| t.from == self.state && self.guard_holds(t.guard))
            .map(|t| t.to)?;
        log::debug!("gaze behaviour: {:?} -> {next:?}", self.state);
        self.state = next;
        self.timer_ms = 0.0;
        self.released = false;

        match next {
            Tracking => self.requested.take(),
            Glance => {
                let target = self.cfg.glances.get(self.glance_cursor).copied();
                self.glance_cursor = (self.glance_cursor + 1) % self.cfg.glances.len().max(1);
                target
            }
            Returning => Some(GazeTarget::NEUTRAL),
            Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> GazeBehaviorConfig {
        GazeBehaviorConfig {
            idle_ms: 100.0,
            glance_ms: 50.0,
            return_ms: 30.0,
            glances: vec![GazeTarget::new(0.5, 0.0, 0.0), GazeTarget::new(-0.5, 0.0, 0.0)],
        }
    }

    #[test]
    fn idle_glance_return_cycle() {
        let mut b = GazeBehavior::new(quick());
        assert_eq!(b.tick(90.0), None);
        assert_eq!(b.tick(10.0), Some(GazeTarget::new(0.5, 0.0, 0.0)));
        assert_eq!(b.state(), GazeState::Glance);
        assert_eq!(b.tick(50.0), Some(GazeTarget::NEUTRAL));
        assert_eq!(b.state(), GazeState::Returning);
        assert_eq!(b.tick(30.0), None);
        assert_eq!(b.state(), GazeState::Idle);
        b.tick(100.0);
        assert_eq!(b.state(), GazeState::Glance);
        assert_eq!(b.timer_ms(), 0.0);
    }

    #[test]
    fn glances_are_visited_round_robin() {
        let mut b = GazeBehavior::new(quick());
        let mut seen = Vec::new();
        for _ in 0..60 {
            if let Some(t) = b.tick(10.0) {
                if t != GazeTarget::NEUTRAL {
                    seen.push(t.x);
                }
            }
        }
        assert!(seen.len() >= 3);
        assert_eq!(&seen[..3], &[0.5, -0.5, 0.5]);
    }

    #[test]
    fn tracking_overrides_and_release_returns() {
        let mut b = GazeBehavior::new(quick());
        b.track(GazeTarget::new(0.2, 0.1, 0.0));
        assert_eq!(b.tick(1.0), Some(GazeTarget::new(0.2, 0.1, 0.0)));
        assert_eq!(b.state(), GazeState::Tracking);

        // tracking has no timeout
        assert_eq!(b.tick(10_000.0), None);

        b.track(GazeTarget::new(-0.2, 0.0, 0.0));
        assert_eq!(b.tick(1.0), Some(GazeTarget::new(-0.2, 0.0, 0.0)));

        b.release();
        assert_eq!(b.tick(1.0), Some(GazeTarget::NEUTRAL));
        assert_eq!(b.state(), GazeState::Returning);
    }

    #[test]
    fn no_glances_means_staying_idle() {
        let mut b = GazeBehavior::new(GazeBehaviorConfig {
            glances: Vec::new(),
            ..quick()
        });
        assert_eq!(b.tick(1_000.0), None);
        assert_eq!(b.state(), GazeState::Idle);
    }
}

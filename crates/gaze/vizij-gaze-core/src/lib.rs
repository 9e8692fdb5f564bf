//! Gaze and head tracking for Vizij faces.
//!
//! `GazeScheduler` converts gaze targets into continuum-pair snippets for the
//! curve scheduler; `GazeBehavior` is a small timed state machine that produces
//! idle glances and tracking targets.

pub mod behavior;
pub mod config;
pub mod scheduler;
pub mod target;

pub use behavior::{GazeBehavior, GazeBehaviorConfig, GazeState};
pub use config::GazeConfig;
pub use scheduler::{
    ramp_keys, GazeScheduler, EYE_PITCH, EYE_SNIPPET, EYE_YAW, GAZE_SNIPPET_PREFIX, HEAD_PITCH,
    HEAD_ROLL, HEAD_SNIPPET, HEAD_YAW,
};
pub use target::GazeTarget;

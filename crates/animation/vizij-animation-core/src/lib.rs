//! Vizij Animation Core (engine-agnostic)
//!
//! Time-based channel sources for the face pipeline:
//! - `scheduler`: many concurrent keyframe snippets, priority/recency conflict
//!   resolution per target, completion events
//! - `transitions`: one-shot eased changes, one per target key
//! - `stored_snippet`: the snippet authoring JSON format
//!
//! Both sources write into a caller-owned `TargetValueTable`.

pub mod config;
pub mod error;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod resolve;
pub mod sampling;
pub mod scheduler;
pub mod snippet;
pub mod stored_snippet;
pub mod transitions;

pub use config::{SampleBand, SchedulerConfig, TransitionConfig};
pub use error::{ScheduleError, SnippetParseError};
pub use ids::{SnippetId, TransitionId};
pub use interp::Easing;
pub use outputs::SchedulerEvent;
pub use resolve::{Contribution, PriorityResolver};
pub use sampling::{sample_curve, sample_keys};
pub use scheduler::CurveScheduler;
pub use snippet::{
    Curve, CurveSpec, CurveTarget, Keyframe, Snippet, SnippetCategory, SnippetSpec, SnippetState,
};
pub use stored_snippet::{parse_snippet_json, parse_snippet_json_named, to_authoring_json};
pub use transitions::{
    TransitionEngine, TransitionHandle, TransitionRequest, TransitionState,
};
pub use vizij_face_api::{TargetKey, TargetValueTable};

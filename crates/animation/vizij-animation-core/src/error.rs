//! Errors raised when scheduling or parsing snippets.

/// Reasons a snippet is refused by `CurveScheduler::schedule`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScheduleError {
    #[error("snippet '{name}' has no curves")]
    EmptyCurveSet { name: String },

    #[error("curve '{curve}' of snippet '{name}' has no keyframes")]
    EmptyCurve { name: String, curve: String },

    #[error("curve '{curve}' of snippet '{name}' is not time-sorted at keyframe {index}")]
    UnsortedKeys {
        name: String,
        curve: String,
        index: usize,
    },

    #[error("curve '{curve}' of snippet '{name}' has a non-finite keyframe at {index}")]
    NonFiniteKey {
        name: String,
        curve: String,
        index: usize,
    },

    #[error("curve id '{curve}' of snippet '{name}' is not a valid target")]
    InvalidCurveId { name: String, curve: String },

    #[error("snippet '{name}' has a non-finite {field}")]
    NonFiniteParameter { name: String, field: &'static str },
}

/// Failures reading or writing the snippet authoring format.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SnippetParseError {
    #[error("snippet parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snippet document has no name")]
    MissingName,

    #[error(transparent)]
    Invalid(#[from] ScheduleError),
}

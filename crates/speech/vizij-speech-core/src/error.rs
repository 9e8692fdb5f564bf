use vizij_animation_core::ScheduleError;

/// Failures surfaced by the speech pipeline. Cleanup after an error is the caller's call.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("speech recognition failed: {0}")]
    Recognition(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

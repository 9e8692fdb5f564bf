//! Speech recognition events and the barge-in interrupt policy.

use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

#[derive(Clone, Debug, PartialEq)]
pub enum RecognitionEvent {
    Interim(String),
    Final(String),
    End,
    Error(SpeechError),
}

/// When heard user speech should cut the face's own speech short.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterruptPolicy {
    Never,
    /// First non-empty interim (or final) transcript.
    #[default]
    OnInterim,
    OnFinal,
}

impl InterruptPolicy {
    pub fn should_interrupt(self, event: &RecognitionEvent) -> bool {
        let heard = |text: &str| !text.trim().is_empty();
        match (self, event) {
            (InterruptPolicy::Never, _) => false,
            (InterruptPolicy::OnInterim, RecognitionEvent::Interim(text)) => heard(text),
            (_, RecognitionEvent::Final(text)) => heard(text),
            _ => false,
        }
    }
}

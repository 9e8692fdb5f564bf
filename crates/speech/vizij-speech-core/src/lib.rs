//! Speech-driven face animation: phoneme extraction, viseme and jaw curve
//! synthesis, and a lip-sync controller that schedules the resulting snippets
//! as synthesizer events arrive.

pub mod config;
pub mod error;
pub mod lipsync;
pub mod phonemes;
pub mod prosody;
pub mod recognition;
pub mod synthesis;
pub mod synthesizer;
pub mod visemes;

pub use config::LipSyncConfig;
pub use error::SpeechError;
pub use lipsync::{LipSyncController, LipSyncEvent, WORD_SNIPPET_PREFIX};
pub use phonemes::{extract_phonemes, PauseKind, Phoneme};
pub use prosody::{ProsodyConfig, ProsodyPlanner, PROSODY_SNIPPET_PREFIX};
pub use recognition::{InterruptPolicy, RecognitionEvent};
pub use synthesis::{
    neutral_return_snippet, plan_word, word_snippet, VisemeEvent, WordPlan, NEUTRAL_SNIPPET,
};
pub use synthesizer::{word_events, ScriptedSynthesizer, SpeechEvent, SpeechSynthesizer};
pub use visemes::{map_phoneme_to_viseme, Viseme, VisemeMapping, VISEME_COUNT};

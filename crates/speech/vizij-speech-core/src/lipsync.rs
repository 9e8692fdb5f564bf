//! Lip-sync controller: turns synthesizer progress into scheduled snippets.
//!
//! Each word boundary schedules one `Combined` word snippet (and possibly a
//! prosodic gesture). Speech end or interruption schedules the neutral return
//! snippet, which outranks word snippets, then drops the word snippets.
//! Errors are reported as events only; the caller decides whether to clean up.

use vizij_animation_core::{CurveScheduler, SnippetId, TargetValueTable};

use crate::config::LipSyncConfig;
use crate::error::SpeechError;
use crate::phonemes::extract_phonemes;
use crate::prosody::{ProsodyPlanner, PROSODY_SNIPPET_PREFIX};
use crate::recognition::RecognitionEvent;
use crate::synthesis::{neutral_return_snippet, plan_word, word_snippet, NEUTRAL_SNIPPET};
use crate::synthesizer::{SpeechEvent, SpeechSynthesizer};
use crate::visemes::VISEME_COUNT;

pub const WORD_SNIPPET_PREFIX: &str = "lipsync:word:";

#[derive(Clone, Debug, PartialEq)]
pub enum LipSyncEvent {
    Started,
    Word {
        word: String,
        char_index: usize,
        snippet: SnippetId,
    },
    Ended,
    Interrupted,
    Error(SpeechError),
}

#[derive(Debug)]
pub struct LipSyncController {
    cfg: LipSyncConfig,
    jaw_au: u32,
    viseme_count: usize,
    prosody: ProsodyPlanner,
    speaking: bool,
    word_index: u32,
    events: Vec<LipSyncEvent>,
}

impl Default for LipSyncController {
    fn default() -> Self {
        Self::new(LipSyncConfig::default(), 26, VISEME_COUNT)
    }
}

impl LipSyncController {
    /// `jaw_au` and `viseme_count` normally come from the active rig profile.
    pub fn new(cfg: LipSyncConfig, jaw_au: u32, viseme_count: usize) -> Self {
        let prosody = ProsodyPlanner::new(cfg.prosody.clone());
        Self {
            cfg,
            jaw_au,
            viseme_count,
            prosody,
            speaking: false,
            word_index: 0,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &LipSyncConfig {
        &self.cfg
    }

    /// Follow a profile switch.
    pub fn set_rig(&mut self, jaw_au: u32, viseme_count: usize) {
        self.jaw_au = jaw_au;
        self.viseme_count = viseme_count;
    }

    #[inline]
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn drain_events(&mut self) -> Vec<LipSyncEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn speak(
        &mut self,
        synth: &mut dyn SpeechSynthesizer,
        text: &str,
    ) -> Result<(), SpeechError> {
        synth.speak(text).map_err(|err| {
            log::warn!("lipsync: synthesizer rejected utterance: {err}");
            self.events.push(LipSyncEvent::Error(err.clone()));
            err
        })
    }

    /// Stop the synthesizer and return the mouth to neutral.
    pub fn stop(
        &mut self,
        synth: &mut dyn SpeechSynthesizer,
        scheduler: &mut CurveScheduler,
        table: &TargetValueTable,
    ) {
        synth.stop();
        self.interrupt(scheduler, table);
    }

    /// Neutral return plus word snippet removal, without touching the synthesizer.
    pub fn interrupt(&mut self, scheduler: &mut CurveScheduler, table: &TargetValueTable) {
        let had_words = scheduler
            .snippets()
            .iter()
            .any(|s| s.name.starts_with(WORD_SNIPPET_PREFIX));
        if !self.speaking && !had_words {
            return;
        }
        self.return_to_neutral(scheduler, table);
        self.speaking = false;
        self.events.push(LipSyncEvent::Interrupted);
    }

    pub fn on_start(&mut self, scheduler: &mut CurveScheduler) {
        scheduler.remove_prefixed(WORD_SNIPPET_PREFIX);
        scheduler.remove(NEUTRAL_SNIPPET);
        self.speaking = true;
        self.word_index = 0;
        self.events.push(LipSyncEvent::Started);
    }

    pub fn on_word_boundary(
        &mut self,
        scheduler: &mut CurveScheduler,
        word: &str,
        char_index: usize,
    ) -> Result<SnippetId, SpeechError> {
        let finished: Vec<String> = scheduler
            .snippets()
            .iter()
            .filter(|s| s.name.starts_with(WORD_SNIPPET_PREFIX) && s.is_completed())
            .map(|s| s.name.clone())
            .collect();
        for name in finished {
            scheduler.remove(&name);
        }

        let index = self.word_index;
        let plan = plan_word(&extract_phonemes(word), self.cfg.speech_rate);
        let spec = word_snippet(
            format!("{WORD_SNIPPET_PREFIX}{index}"),
            &plan,
            &self.cfg,
            self.jaw_au,
        );
        log::debug!(
            "lipsync: word {index} '{word}' -> {} phonemes, {:.0} ms",
            plan.phonemes.len(),
            plan.total_ms
        );
        let id = scheduler.schedule(spec)?;
        if let Some(gesture) = self.prosody.plan(word, index) {
            scheduler.schedule(gesture)?;
        }

        self.word_index += 1;
        self.events.push(LipSyncEvent::Word {
            word: word.to_string(),
            char_index,
            snippet: id,
        });
        Ok(id)
    }

    pub fn on_end(&mut self, scheduler: &mut CurveScheduler, table: &TargetValueTable) {
        self.return_to_neutral(scheduler, table);
        self.speaking = false;
        self.events.push(LipSyncEvent::Ended);
    }

    pub fn on_error(&mut self, err: SpeechError) {
        log::warn!("lipsync: {err}");
        self.events.push(LipSyncEvent::Error(err));
    }

    /// Route one synthesizer event.
    pub fn handle(
        &mut self,
        event: SpeechEvent,
        scheduler: &mut CurveScheduler,
        table: &TargetValueTable,
    ) -> Result<(), SpeechError> {
        match event {
            SpeechEvent::Start => self.on_start(scheduler),
            SpeechEvent::WordBoundary { word, char_index } => {
                self.on_word_boundary(scheduler, &word, char_index)?;
            }
            SpeechEvent::End => self.on_end(scheduler, table),
            SpeechEvent::Error(err) => self.on_error(err),
        }
        Ok(())
    }

    /// Apply the interrupt policy to a recognition event. Returns true when
    /// speech was cut short.
    pub fn on_recognition(
        &mut self,
        event: &RecognitionEvent,
        synth: &mut dyn SpeechSynthesizer,
        scheduler: &mut CurveScheduler,
        table: &TargetValueTable,
    ) -> bool {
        if let RecognitionEvent::Error(err) = event {
            self.on_error(err.clone());
            return false;
        }
        if self.speaking && self.cfg.interrupt_policy.should_interrupt(event) {
            log::debug!("lipsync: interrupted by user speech");
            self.stop(synth, scheduler, table);
            return true;
        }
        false
    }

    fn return_to_neutral(&mut self, scheduler: &mut CurveScheduler, table: &TargetValueTable) {
        let neutral = neutral_return_snippet(table, self.viseme_count, self.jaw_au, &self.cfg);
        if let Err(err) = scheduler.schedule(neutral) {
            log::warn!("lipsync: neutral return rejected: {err}");
        }
        let removed = scheduler.remove_prefixed(WORD_SNIPPET_PREFIX)
            + scheduler.remove_prefixed(PROSODY_SNIPPET_PREFIX);
        log::debug!("lipsync: neutral return, {removed} snippets dropped");
    }
}

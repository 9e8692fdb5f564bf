//! Speech synthesizer contract and a scripted implementation for headless runs.

use std::collections::VecDeque;

use crate::error::SpeechError;

/// Host text-to-speech engine. Progress arrives later as `SpeechEvent`s, either
/// pushed by the host or pulled once per frame through `update`.
pub trait SpeechSynthesizer {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
    fn stop(&mut self);

    /// Advance the synthesizer's clock and return events that became due.
    fn update(&mut self, _dt_s: f32) -> Vec<SpeechEvent> {
        Vec::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SpeechEvent {
    Start,
    WordBoundary { word: String, char_index: usize },
    End,
    Error(SpeechError),
}

/// Word boundary events for whitespace-separated words, with byte offsets.
pub fn word_events(text: &str) -> Vec<SpeechEvent> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push(SpeechEvent::WordBoundary {
                    word: text[s..i].to_string(),
                    char_index: s,
                });
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(SpeechEvent::WordBoundary {
            word: text[s..].to_string(),
            char_index: s,
        });
    }
    out
}

/// Queues `Start`, one boundary per word and `End` for every accepted utterance.
///
/// Events are timed: `Start` at once, then one word every `word_ms`, then `End`.
/// `update` releases them by clock; `next_event` and `drain_events` ignore timing.
#[derive(Debug)]
pub struct ScriptedSynthesizer {
    pub spoken: Vec<String>,
    pub stops: usize,
    /// Returned (once) by the next `speak` call.
    pub fail_next: Option<SpeechError>,
    pub word_ms: f32,
    clock_ms: f32,
    pending: VecDeque<(f32, SpeechEvent)>,
}

impl Default for ScriptedSynthesizer {
    fn default() -> Self {
        Self {
            spoken: Vec::new(),
            stops: 0,
            fail_next: None,
            word_ms: 250.0,
            clock_ms: 0.0,
            pending: VecDeque::new(),
        }
    }
}

impl ScriptedSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word_ms(mut self, word_ms: f32) -> Self {
        self.word_ms = word_ms.max(0.0);
        self
    }

    pub fn next_event(&mut self) -> Option<SpeechEvent> {
        self.pending.pop_front().map(|(_, ev)| ev)
    }

    pub fn drain_events(&mut self) -> Vec<SpeechEvent> {
        self.pending.drain(..).map(|(_, ev)| ev).collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl SpeechSynthesizer for ScriptedSynthesizer {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.spoken.push(text.to_string());
        let mut at = self
            .pending
            .back()
            .map_or(self.clock_ms, |(due, _)| due.max(self.clock_ms));
        self.pending.push_back((at, SpeechEvent::Start));
        for word in word_events(text) {
            self.pending.push_back((at, word));
            at += self.word_ms;
        }
        self.pending.push_back((at, SpeechEvent::End));
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.pending.clear();
    }

    fn update(&mut self, dt_s: f32) -> Vec<SpeechEvent> {
        self.clock_ms += dt_s.max(0.0) * 1000.0;
        let mut due = Vec::new();
        while self
            .pending
            .front()
            .is_some_and(|(at, _)| *at <= self.clock_ms)
        {
            if let Some((_, ev)) = self.pending.pop_front() {
                due.push(ev);
            }
        }
        due
    }
}

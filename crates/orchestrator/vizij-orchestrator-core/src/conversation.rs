//! Conversation flow interpreter.
//!
//! A flow is a list of steps run in order. `Say` waits for the speech to end,
//! `Wait` waits on a timer and `AwaitReply` waits for a message (optionally with a
//! timeout). Other steps run immediately. Each call returns the actions the engine
//! must carry out, in order.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use vizij_gaze_core::GazeTarget;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FlowStep {
    /// `{reply}` is replaced by the last received message.
    Say { text: String },
    Look { target: GazeTarget },
    /// Snippet in authoring JSON form.
    Gesture { snippet: JsonValue },
    Wait { ms: f32 },
    #[serde(rename_all = "camelCase")]
    AwaitReply {
        #[serde(default)]
        timeout_ms: Option<f32>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowEvent {
    SpeechEnded,
    MessageReceived(String),
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum FlowAction {
    Say(String),
    Look(GazeTarget),
    Gesture(JsonValue),
    Finished,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Waiting {
    #[default]
    Nothing,
    Speech,
    Timer { remaining_ms: f32 },
    Reply { remaining_ms: Option<f32> },
}

#[derive(Clone, Debug, Default)]
pub struct ConversationFlow {
    steps: Vec<FlowStep>,
    cursor: usize,
    waiting: Waiting,
    running: bool,
    last_reply: Option<String>,
}

impl ConversationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(s: &str) -> anyhow::Result<Vec<FlowStep>> {
        Ok(serde_json::from_str(s)?)
    }

    /// Replace any running flow and run up to the first wait.
    pub fn start(&mut self, steps: Vec<FlowStep>) -> Vec<FlowAction> {
        log::debug!("conversation: start ({} steps)", steps.len());
        self.steps = steps;
        self.cursor = 0;
        self.waiting = Waiting::Nothing;
        self.running = true;
        self.last_reply = None;
        self.run()
    }

    pub fn cancel(&mut self) {
        self.running = false;
        self.waiting = Waiting::Nothing;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Index of the step being executed or waited on.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.last_reply.as_deref()
    }

    pub fn is_waiting_for_speech(&self) -> bool {
        self.running && self.waiting == Waiting::Speech
    }

    pub fn handle(&mut self, event: FlowEvent) -> Vec<FlowAction> {
        if !self.running {
            return Vec::new();
        }
        let resumed = match (self.waiting, event) {
            (Waiting::Speech, FlowEvent::SpeechEnded) => true,
            (Waiting::Reply { .. }, FlowEvent::MessageReceived(text)) => {
                self.last_reply = Some(text);
                true
            }
            (Waiting::Timer { .. } | Waiting::Reply { .. }, FlowEvent::Timeout) => true,
            _ => false,
        };
        if !resumed {
            return Vec::new();
        }
        self.waiting = Waiting::Nothing;
        self.run()
    }

    /// Count down timers; expiry resumes the flow.
    pub fn tick(&mut self, dt_ms: f32) -> Vec<FlowAction> {
        if !self.running {
            return Vec::new();
        }
        let dt_ms = dt_ms.max(0.0);
        let expired = match &mut self.waiting {
            Waiting::Timer { remaining_ms } | Waiting::Reply {
                remaining_ms: Some(remaining_ms),
            } => {
                *remaining_ms -= dt_ms;
                *remaining_ms <= 0.0
            }
            _ => false,
        };
        if expired {
            self.handle(FlowEvent::Timeout)
        } else {
            Vec::new()
        }
    }

    fn run(&mut self) -> Vec<FlowAction> {
        let mut actions = Vec::new();
        while self.waiting == Waiting::Nothing {
            let Some(step) = self.steps.get(self.cursor) else {
                self.running = false;
                actions.push(FlowAction::Finished);
                log::debug!("conversation: finished");
                break;
            };
            self.cursor += 1;
            match step {
                FlowStep::Say { text } => {
                    let reply = self.last_reply.as_deref().unwrap_or("");
                    actions.push(FlowAction::Say(text.replace("{reply}", reply)));
                    self.waiting = Waiting::Speech;
                }
                FlowStep::Look { target } => actions.push(FlowAction::Look(*target)),
                FlowStep::Gesture { snippet } => actions.push(FlowAction::Gesture(snippet.clone())),
                FlowStep::Wait { ms } => {
                    self.waiting = Waiting::Timer {
                        remaining_ms: ms.max(0.0),
                    }
                }
                FlowStep::AwaitReply { timeout_ms } => {
                    self.waiting = Waiting::Reply {
                        remaining_ms: *timeout_ms,
                    }
                }
            }
        }
        actions
    }
}

//! Semantic events emitted by the scheduler.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum SchedulerEvent {
    /// A scheduled snippet was promoted to playing.
    SnippetStarted { name: String },
    /// A non-looping snippet reached its end. Fired once per run.
    SnippetEnded { name: String },
    /// A schedule under an existing name replaced the previous snippet.
    SnippetReplaced { name: String },
    SnippetRemoved { name: String },
}

impl SchedulerEvent {
    pub fn name(&self) -> &str {
        match self {
            SchedulerEvent::SnippetStarted { name }
            | SchedulerEvent::SnippetEnded { name }
            | SchedulerEvent::SnippetReplaced { name }
            | SchedulerEvent::SnippetRemoved { name } => name,
        }
    }
}

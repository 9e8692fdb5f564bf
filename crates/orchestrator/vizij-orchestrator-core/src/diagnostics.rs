use serde::Serialize;

use vizij_animation_core::SchedulerEvent;

use crate::conversation::FlowAction;

/// Per-frame summary, serializable for host-side inspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDiagnostics {
    pub epoch: u64,
    pub dt: f32,
    pub paused: bool,
    pub active_snippets: Vec<String>,
    pub active_transitions: usize,
    pub morph_writes: usize,
    pub bone_writes: usize,
    pub scheduler_events: Vec<SchedulerEvent>,
    pub flow_actions: Vec<FlowAction>,
    /// Non-fatal failures raised while handling requests this frame.
    pub errors: Vec<String>,
}

impl FrameDiagnostics {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

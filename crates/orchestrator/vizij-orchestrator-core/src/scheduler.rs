//! Fixed-order frame pipeline.
//!
//! 1. requests: queued speech events, behaviour ticks, flow actions, promotion
//! 2. snippets: advance, sample, resolve, write winners
//! 3. transitions: advance and write
//! 4. compose: value table to morph and bone writes
//! 5. flush: hand the batch to the sink
//!
//! `TickOrder::TransitionsFirst` swaps 2 and 3. While paused, 2 and 3 are skipped
//! and the table keeps last frame's values.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use vizij_animation_core::parse_snippet_json;
use vizij_face_api::RigSink;
use vizij_speech_core::{SpeechError, SpeechEvent};

use crate::conversation::{FlowAction, FlowEvent};
use crate::diagnostics::FrameDiagnostics;
use crate::{FaceEngine, FaceFrame};

/// Which writer goes last when a snippet and a transition share a target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickOrder {
    /// Transitions write last and win shared targets.
    #[default]
    SnippetsThenTransitions,
    /// Snippets write last.
    TransitionsFirst,
}

pub(crate) fn run_tick(engine: &mut FaceEngine, dt: f32, sink: &mut dyn RigSink) -> FaceFrame {
    let mut diag = FrameDiagnostics {
        epoch: engine.epoch,
        dt,
        paused: engine.paused,
        ..Default::default()
    };

    apply_requests(engine, dt, &mut diag);

    if !engine.paused {
        match engine.cfg.tick_order {
            TickOrder::SnippetsThenTransitions => {
                advance_snippets(engine, dt);
                engine.transitions.tick(dt, &mut engine.table);
            }
            TickOrder::TransitionsFirst => {
                engine.transitions.tick(dt, &mut engine.table);
                advance_snippets(engine, dt);
            }
        }
    }

    let writes = engine.applier.build(&engine.resolver, &engine.table);
    writes.apply_to(sink);

    diag.active_snippets = engine
        .scheduler
        .active_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    diag.active_transitions = engine.transitions.len();
    diag.morph_writes = writes.morphs.len();
    diag.bone_writes = writes.bones.len();
    diag.scheduler_events = engine.scheduler.drain_events();

    let speech_events = engine
        .behaviors
        .lipsync_mut()
        .map(|l| l.drain_events())
        .unwrap_or_default();

    FaceFrame {
        writes,
        speech_events,
        diagnostics: diag,
    }
}

fn advance_snippets(engine: &mut FaceEngine, dt: f32) {
    engine.scheduler.advance(dt);
    engine.scheduler.apply(&mut engine.table);
}

fn apply_requests(engine: &mut FaceEngine, dt: f32, diag: &mut FrameDiagnostics) {
    // behaviour clocks stop with the global pause
    let behavior_dt = if engine.paused { 0.0 } else { dt };

    let mut actions: VecDeque<FlowAction> = std::mem::take(&mut engine.pending_actions).into();

    let mut speech = std::mem::take(&mut engine.pending_speech);
    if let Some(synth) = engine.synth.as_deref_mut() {
        speech.extend(synth.update(behavior_dt));
    }
    for event in speech {
        route_speech(engine, event, &mut actions, diag);
    }

    if let Some(flow) = engine.behaviors.conversation_mut() {
        actions.extend(flow.tick(behavior_dt * 1000.0));
    }
    if let Some(target) = engine
        .behaviors
        .idle_gaze_mut()
        .and_then(|b| b.tick(behavior_dt * 1000.0))
    {
        if let Some(gaze) = engine.behaviors.gaze_mut() {
            gaze.set_target(target, &mut engine.scheduler);
        }
    }

    while let Some(action) = actions.pop_front() {
        execute(engine, &action, &mut actions, diag);
        diag.flow_actions.push(action);
    }

    if let Some(gaze) = engine.behaviors.gaze_mut() {
        gaze.tick(behavior_dt, &mut engine.scheduler);
    }
    engine.scheduler.promote();
}

fn route_speech(
    engine: &mut FaceEngine,
    event: SpeechEvent,
    actions: &mut VecDeque<FlowAction>,
    diag: &mut FrameDiagnostics,
) {
    // a failed utterance must not stall a flow waiting on it
    let finished = matches!(event, SpeechEvent::End | SpeechEvent::Error(_));
    if let Some(lipsync) = engine.behaviors.lipsync_mut() {
        if let Err(err) = lipsync.handle(event, &mut engine.scheduler, &engine.table) {
            diag.errors.push(err.to_string());
        }
    }
    if finished {
        if let Some(flow) = engine.behaviors.conversation_mut() {
            actions.extend(flow.handle(FlowEvent::SpeechEnded));
        }
    }
}

fn execute(
    engine: &mut FaceEngine,
    action: &FlowAction,
    actions: &mut VecDeque<FlowAction>,
    diag: &mut FrameDiagnostics,
) {
    match action {
        FlowAction::Say(text) => {
            if let Err(err) = engine.speak(text) {
                diag.errors.push(err.to_string());
                if let Some(flow) = engine.behaviors.conversation_mut() {
                    actions.extend(flow.handle(FlowEvent::SpeechEnded));
                }
            }
        }
        FlowAction::Look(target) => match engine.behaviors.gaze_mut() {
            Some(gaze) => {
                gaze.set_target(*target, &mut engine.scheduler);
            }
            None => log::warn!("conversation: look step without a gaze module"),
        },
        FlowAction::Gesture(doc) => {
            let scheduled = parse_snippet_json(&doc.to_string())
                .map_err(|e| e.to_string())
                .and_then(|spec| engine.scheduler.schedule(spec).map_err(|e| e.to_string()));
            if let Err(err) = scheduled {
                diag.errors.push(format!("gesture: {err}"));
            }
        }
        FlowAction::Finished => {}
    }
}

pub(crate) fn no_synthesizer() -> SpeechError {
    SpeechError::Synthesis("no synthesizer attached".into())
}

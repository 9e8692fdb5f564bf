//! vizij-orchestrator
//!
//! `FaceEngine` owns every runtime piece of a face (value table, curve scheduler,
//! transition engine, behaviour modules, rig resolver) and advances them in one
//! fixed-order tick per frame. Hosts call `step(dt, sink)` from their render loop
//! and feed speech, recognition and conversation events in between.

pub mod behaviors;
pub mod config;
pub mod conversation;
pub mod diagnostics;
pub mod scheduler;

use anyhow::{Context, Result};

use vizij_animation_core::{
    parse_snippet_json, CurveScheduler, ScheduleError, SnippetId, SnippetSpec, TargetValueTable,
    TransitionEngine, TransitionHandle, TransitionId, TransitionRequest,
};
use vizij_face_api::{RigSink, RigWriteBatch};
use vizij_gaze_core::GazeTarget;
use vizij_rig_core::{BindReport, MappingResolver, Profile, RigApplier, RigScene};
use vizij_speech_core::{LipSyncEvent, RecognitionEvent, SpeechError, SpeechEvent, SpeechSynthesizer};

pub use crate::behaviors::{BehaviorModule, BehaviorRegistry};
pub use crate::config::{BehaviorKind, FaceEngineConfig};
pub use crate::conversation::{ConversationFlow, FlowAction, FlowEvent, FlowStep};
pub use crate::diagnostics::FrameDiagnostics;
pub use crate::scheduler::TickOrder;

/// Output of one `FaceEngine::step`.
#[derive(Debug, Clone)]
pub struct FaceFrame {
    /// Everything flushed to the sink this frame, in application order.
    pub writes: RigWriteBatch,
    pub speech_events: Vec<LipSyncEvent>,
    pub diagnostics: FrameDiagnostics,
}

pub struct FaceEngine {
    pub(crate) cfg: FaceEngineConfig,
    pub(crate) resolver: MappingResolver,
    pub(crate) applier: RigApplier,
    pub(crate) bind_report: BindReport,
    pub(crate) scheduler: CurveScheduler,
    pub(crate) transitions: TransitionEngine,
    pub(crate) table: TargetValueTable,
    pub(crate) behaviors: BehaviorRegistry,
    pub(crate) synth: Option<Box<dyn SpeechSynthesizer>>,
    pub(crate) pending_speech: Vec<SpeechEvent>,
    pub(crate) pending_actions: Vec<FlowAction>,
    pub(crate) paused: bool,
    pub(crate) epoch: u64,
}

impl std::fmt::Debug for FaceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceEngine")
            .field("profile", &self.resolver.profile().name)
            .field("epoch", &self.epoch)
            .field("paused", &self.paused)
            .field("snippets", &self.scheduler.len())
            .field("transitions", &self.transitions.len())
            .field("behaviors", &self.behaviors.kinds())
            .field("synth", &self.synth.is_some())
            .finish()
    }
}

impl FaceEngine {
    /// Build an engine and bind `profile` against `scene`.
    pub fn new(cfg: FaceEngineConfig, profile: Profile, scene: &dyn RigScene) -> Self {
        let jaw_au = profile.jaw_au;
        let viseme_count = profile.viseme_keys.len();
        let mut resolver = MappingResolver::new(profile);
        let bind_report = resolver.bind_scene(scene);
        if !bind_report.missing.is_empty() {
            log::warn!("face engine: unresolved bones {:?}", bind_report.missing);
        }
        Self {
            scheduler: CurveScheduler::new(cfg.scheduler.clone()),
            transitions: TransitionEngine::new(cfg.transitions.clone()),
            behaviors: BehaviorRegistry::from_config(&cfg, jaw_au, viseme_count),
            cfg,
            resolver,
            applier: RigApplier::new(),
            bind_report,
            table: TargetValueTable::new(),
            synth: None,
            pending_speech: Vec::new(),
            pending_actions: Vec::new(),
            paused: false,
            epoch: 0,
        }
    }

    /// Build from a JSON engine config and a JSON profile.
    pub fn from_json(config_json: &str, profile_json: &str, scene: &dyn RigScene) -> Result<Self> {
        let cfg = FaceEngineConfig::from_json(config_json)?;
        let profile = Profile::from_json(profile_json).context("invalid rig profile")?;
        Ok(Self::new(cfg, profile, scene))
    }

    pub fn with_synthesizer(mut self, synth: impl SpeechSynthesizer + 'static) -> Self {
        self.synth = Some(Box::new(synth));
        self
    }

    pub fn set_synthesizer(&mut self, synth: Box<dyn SpeechSynthesizer>) {
        self.synth = Some(synth);
    }

    /// Advance one frame and flush the result to `sink`.
    pub fn step(&mut self, dt: f32, sink: &mut dyn RigSink) -> Result<FaceFrame> {
        // advance epoch first to mark this frame
        self.epoch = self.epoch.wrapping_add(1);
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        Ok(scheduler::run_tick(self, dt, sink))
    }

    pub fn config(&self) -> &FaceEngineConfig {
        &self.cfg
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn bind_report(&self) -> &BindReport {
        &self.bind_report
    }

    pub fn resolver(&self) -> &MappingResolver {
        &self.resolver
    }

    /// Swap rigs. Bones are re-resolved and lip sync follows the new jaw AU.
    pub fn set_profile(&mut self, profile: Profile, scene: &dyn RigScene) -> &BindReport {
        let jaw_au = profile.jaw_au;
        let viseme_count = profile.viseme_keys.len();
        self.bind_report = self.resolver.set_profile(profile, scene);
        if let Some(lipsync) = self.behaviors.lipsync_mut() {
            lipsync.set_rig(jaw_au, viseme_count);
        }
        &self.bind_report
    }

    pub fn table(&self) -> &TargetValueTable {
        &self.table
    }

    pub fn scheduler(&self) -> &CurveScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut CurveScheduler {
        &mut self.scheduler
    }

    pub fn transitions(&self) -> &TransitionEngine {
        &self.transitions
    }

    pub fn transitions_mut(&mut self) -> &mut TransitionEngine {
        &mut self.transitions
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    pub fn behaviors_mut(&mut self) -> &mut BehaviorRegistry {
        &mut self.behaviors
    }

    // --- global pause ---

    pub fn pause(&mut self) {
        log::debug!("face engine: pause");
        self.paused = true;
    }

    pub fn resume(&mut self) {
        log::debug!("face engine: resume");
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // --- direct channel control ---

    /// Manual slider write. Any snippet or transition on the same AU overrides it.
    pub fn set_au(&mut self, au: u32, value: f32) {
        self.table.set_au(au, value);
    }

    pub fn schedule(&mut self, spec: SnippetSpec) -> std::result::Result<SnippetId, ScheduleError> {
        self.scheduler.schedule(spec)
    }

    pub fn schedule_json(&mut self, json: &str) -> Result<SnippetId> {
        let spec = parse_snippet_json(json).context("invalid snippet document")?;
        Ok(self.scheduler.schedule(spec)?)
    }

    pub fn remove_snippet(&mut self, name: &str) -> bool {
        self.scheduler.remove(name)
    }

    pub fn start_transition(&mut self, req: TransitionRequest) -> TransitionHandle {
        self.transitions.start(&mut self.table, req)
    }

    pub fn cancel_transition(&mut self, id: TransitionId) -> bool {
        self.transitions.cancel(id)
    }

    // --- speech ---

    pub fn speak(&mut self, text: &str) -> std::result::Result<(), SpeechError> {
        let Some(synth) = self.synth.as_deref_mut() else {
            return Err(scheduler::no_synthesizer());
        };
        match self.behaviors.lipsync_mut() {
            Some(lipsync) => lipsync.speak(synth, text),
            None => synth.speak(text),
        }
    }

    pub fn stop_speaking(&mut self) {
        match (self.synth.as_deref_mut(), self.behaviors.lipsync_mut()) {
            (Some(synth), Some(lipsync)) => lipsync.stop(synth, &mut self.scheduler, &self.table),
            (None, Some(lipsync)) => lipsync.interrupt(&mut self.scheduler, &self.table),
            (Some(synth), None) => synth.stop(),
            (None, None) => {}
        }
        self.pending_speech.clear();
    }

    /// Queue a synthesizer event for the next frame (push-style hosts).
    pub fn push_speech_event(&mut self, event: SpeechEvent) {
        self.pending_speech.push(event);
    }

    /// Apply the lip-sync interrupt policy. Returns true when speech was cut short.
    pub fn on_recognition(&mut self, event: &RecognitionEvent) -> bool {
        let Some(lipsync) = self.behaviors.lipsync_mut() else {
            return false;
        };
        let interrupted = match self.synth.as_deref_mut() {
            Some(synth) => lipsync.on_recognition(event, synth, &mut self.scheduler, &self.table),
            None => false,
        };
        if interrupted {
            self.pending_speech.clear();
        }
        interrupted
    }

    // --- gaze ---

    /// Explicit gaze request. Idle glances hold off until the gaze is released.
    pub fn look_at(&mut self, target: GazeTarget) -> bool {
        if let Some(idle) = self.behaviors.idle_gaze_mut() {
            idle.track(target);
        }
        match self.behaviors.gaze_mut() {
            Some(gaze) => gaze.set_target(target, &mut self.scheduler),
            None => false,
        }
    }

    pub fn stop_gaze(&mut self) {
        if let Some(idle) = self.behaviors.idle_gaze_mut() {
            idle.release();
        }
        if let Some(gaze) = self.behaviors.gaze_mut() {
            gaze.stop(&mut self.scheduler);
        }
    }

    pub fn reset_gaze(&mut self) -> bool {
        if let Some(idle) = self.behaviors.idle_gaze_mut() {
            idle.release();
        }
        match self.behaviors.gaze_mut() {
            Some(gaze) => gaze.reset_to_neutral(&mut self.scheduler),
            None => false,
        }
    }

    // --- conversation ---

    /// Start a flow; its first actions run on the next frame.
    pub fn start_conversation(&mut self, steps: Vec<FlowStep>) -> bool {
        let Some(flow) = self.behaviors.conversation_mut() else {
            log::warn!("face engine: no conversation module configured");
            return false;
        };
        let actions = flow.start(steps);
        self.pending_actions.extend(actions);
        true
    }

    pub fn post_message(&mut self, text: impl Into<String>) {
        if let Some(flow) = self.behaviors.conversation_mut() {
            let actions = flow.handle(FlowEvent::MessageReceived(text.into()));
            self.pending_actions.extend(actions);
        }
    }
}

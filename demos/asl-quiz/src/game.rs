use glam::{EulerRot, Vec3};
use fingerspell_engine::*;

use crate::anchor::{AnchorPlacer, AnchorSource, Placement};
use crate::charge::PoseChargeTimer;
use crate::config::QuizConfig;
use crate::driver::QuestionDriver;
use crate::ghost::GhostHand;
use crate::listener::{ListenerOutcome, PoseListener};
use crate::progress::ProgressBar;
use crate::questions::QuestionBank;
use crate::reference::ReferenceChart;
use crate::rig::Rig;
use crate::session::{SessionRequest, SessionTimers};
use crate::sfx::{Cue, SfxMap};
use crate::state::{GameState, QuizSession};

// Game event kinds (Rust → host)
/// a = state code, b = question index, c = question count.
pub const EVENT_STATE: f32 = 1.0;
/// a, b, c = anchor position. Always followed by `EVENT_ANCHOR_YAW`.
pub const EVENT_PERSIST_ANCHOR: f32 = 2.0;
/// a = anchor yaw in radians.
pub const EVENT_ANCHOR_YAW: f32 = 3.0;
pub const EVENT_RESTORE_ANCHORS: f32 = 4.0;
pub const EVENT_ROOM_CAPTURE: f32 = 5.0;
/// The user discarded the anchor; the host deletes its persisted anchors.
pub const EVENT_DELETE_ANCHORS: f32 = 6.0;

// Documents the host may load
const DOC_QUESTIONS: &str = "questions";
const DOC_HAND_BONES: &str = "hand_bones";

const END_TEXT: &str = "Well done!";

const ANCHOR_MARKER_SIZE: f32 = 0.05;
const NEW_ANCHOR_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const RESTORED_ANCHOR_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

pub struct AslQuiz {
    config: QuizConfig,
    sfx: SfxMap,
    questions: Option<QuestionBank>,
    bones: JointBinding<u32>,
    session: QuizSession,
    rig: Rig,
    placer: AnchorPlacer,
    anchor: Option<EntityId>,
    timers: SessionTimers,
    driver: Option<QuestionDriver>,
    listener: PoseListener,
    progress: Option<ProgressBar>,
    ghost: Option<GhostHand>,
    chart: Option<ReferenceChart>,
    /// Audio cues raised this frame.
    cues: Vec<Cue>,
}

impl AslQuiz {
    pub fn new() -> Self {
        let config = QuizConfig::default();
        let listener = PoseListener::new(Self::timer_for(&config));
        Self {
            config,
            sfx: SfxMap::default(),
            questions: None,
            bones: JointBinding::webxr(),
            session: QuizSession::new(),
            rig: Rig::new(),
            placer: AnchorPlacer::new(),
            anchor: None,
            timers: SessionTimers::new(),
            driver: None,
            listener,
            progress: None,
            ghost: None,
            chart: None,
            cues: Vec::new(),
        }
    }

    fn timer_for(config: &QuizConfig) -> PoseChargeTimer {
        PoseChargeTimer::new(config.charge_threshold_ms, config.decay_multiplier)
    }

    pub fn state(&self) -> GameState {
        self.session.state()
    }

    fn emit_state(&self, ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::new(
            EVENT_STATE,
            self.session.state().code(),
            self.session.question_index() as f32,
            self.session.total() as f32,
        ));
    }

    fn handle_event(&mut self, ctx: &mut EngineContext, frame: &XrFrame, event: InputEvent) {
        match event {
            InputEvent::SessionStarted { mode } => {
                log::info!("{:?} session started", mode);
                self.placer.session_started(mode);
                self.timers.start(
                    mode,
                    self.config.restore_anchor_delay,
                    self.config.room_capture_delay,
                );
            }
            InputEvent::SessionEnded => {
                log::info!("session ended");
                self.placer.session_ended();
                self.timers.stop();
                self.listener.silence(&mut self.cues);
            }
            InputEvent::ControllerConnected { hand } => self.placer.controller_connected(hand),
            InputEvent::ControllerDisconnected { hand } => self.placer.controller_disconnected(hand),
            InputEvent::PinchEnd { hand } => {
                if let Some(placement) = self.placer.pinch(hand, frame) {
                    self.place_anchor(ctx, placement);
                }
            }
            InputEvent::SqueezeStart { hand } => {
                if self.placer.clear() {
                    log::info!("anchor discarded ({} hand squeeze)", hand.as_str());
                }
                ctx.emit_event(GameEvent::new(EVENT_DELETE_ANCHORS, 0.0, 0.0, 0.0));
            }
            InputEvent::AnchorRestored { position, orientation } => {
                if let Some(placement) = self.placer.restored(Pose::new(position, orientation)) {
                    self.place_anchor(ctx, placement);
                }
            }
            InputEvent::PlanesDetected { count } => self.timers.planes_detected(count),
            InputEvent::AssetLoaded { request, min, max } => {
                if self.session.state() != GameState::Loading {
                    log::warn!("model reply {:?} while {:?}", request, self.session.state());
                    return;
                }
                if let Some(driver) = self.driver.as_mut() {
                    driver.on_loaded(&mut self.rig, ctx, request, min, max, &self.config);
                }
            }
            InputEvent::AssetFailed { request } => {
                if self.session.state() != GameState::Loading {
                    return;
                }
                let Some(driver) = self.driver.as_mut() else { return };
                if driver.on_failed(&mut self.rig, ctx, request) {
                    match self.session.failed() {
                        Ok(_) => self.emit_state(ctx),
                        Err(e) => log::warn!("{}", e),
                    }
                }
            }
            InputEvent::Custom { kind, .. } => log::debug!("unhandled custom event {}", kind),
        }
    }

    /// Spawn the anchor (or move it on a later session) and tell the host to
    /// persist freshly pinched anchors.
    fn place_anchor(&mut self, ctx: &mut EngineContext, placement: Placement) {
        let Placement { pose, source } = placement;
        match self.anchor {
            Some(id) => {
                if let Some(entity) = ctx.scene.get_mut(id) {
                    entity.local.translation = pose.position;
                    entity.local.rotation = pose.orientation;
                }
            }
            None => {
                let id = self.rig.spawn(ctx, None, |e| {
                    e.with_tag("anchor")
                        .with_translation(pose.position)
                        .with_rotation(pose.orientation)
                });
                let color = if source == AnchorSource::Restored {
                    RESTORED_ANCHOR_COLOR
                } else {
                    NEW_ANCHOR_COLOR
                };
                self.rig.spawn(ctx, Some(id), |e| {
                    e.with_kind(EntityKind::Panel)
                        .with_scale(Vec3::splat(ANCHOR_MARKER_SIZE))
                        .with_tint(color)
                });
                self.driver = Some(QuestionDriver::attach(&mut self.rig, ctx, id, &self.config));
                self.anchor = Some(id);
            }
        }

        if source == AnchorSource::Pinch {
            let p = pose.position;
            let (yaw, _, _) = pose.orientation.to_euler(EulerRot::YXZ);
            ctx.emit_event(GameEvent::new(EVENT_PERSIST_ANCHOR, p.x, p.y, p.z));
            ctx.emit_event(GameEvent::new(EVENT_ANCHOR_YAW, yaw, 0.0, 0.0));
        }
    }

    /// START → LOADING once both the anchor and the questions exist.
    fn try_begin(&mut self, ctx: &mut EngineContext) {
        if self.session.state() != GameState::Start {
            return;
        }
        let Some(anchor) = self.anchor else { return };
        let Some(total) = self.questions.as_ref().map(QuestionBank::len) else { return };

        if let Err(e) = self.session.begin(total) {
            log::warn!("{}", e);
            return;
        }
        self.emit_state(ctx);

        let progress_offset = Vec3::from_array(self.config.progress_offset);
        self.progress = Some(ProgressBar::new(&mut self.rig, ctx, anchor, progress_offset, total));
        let ghost_offset = Vec3::from_array(self.config.ghost_offset);
        self.ghost = Some(GhostHand::new(
            &mut self.rig,
            ctx,
            anchor,
            ghost_offset,
            self.config.ghost_hand,
            &self.bones,
        ));
        self.load_current(ctx);
    }

    fn load_current(&mut self, ctx: &mut EngineContext) {
        let index = self.session.question_index();
        let Some(question) = self.questions.as_ref().and_then(|bank| bank.get(index)) else {
            log::error!("no question #{}", index);
            return;
        };
        if let Some(driver) = self.driver.as_mut() {
            driver.load(&mut self.rig, ctx, question, &self.config);
        }
        if let Some(ghost) = self.ghost.as_mut() {
            ghost.hide(&mut ctx.scene);
        }
    }

    /// The pose was held: next question, or the end.
    fn advance(&mut self, ctx: &mut EngineContext) {
        let state = match self.session.answered() {
            Ok(state) => state,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };
        if let Some(progress) = self.progress.as_mut() {
            progress.set_answered(ctx, self.session.question_index());
        }
        self.emit_state(ctx);

        match state {
            GameState::Loading => self.load_current(ctx),
            GameState::End => {
                log::info!("quiz complete");
                self.cues.push(Cue::GameOver);
                if let Some(driver) = self.driver.as_mut() {
                    driver.finish(&mut self.rig, ctx, END_TEXT, &self.config);
                }
                if let Some(ghost) = self.ghost.as_mut() {
                    ghost.hide(&mut ctx.scene);
                }
            }
            other => log::warn!("unexpected state after answer: {:?}", other),
        }
    }

    /// LOADING → ANSWERING when the entrance finishes. The listener is armed
    /// in the same update.
    fn on_completions(&mut self, ctx: &mut EngineContext, ids: &[u32]) {
        let Some(driver) = self.driver.as_mut() else { return };
        if !driver.on_completions(&mut self.rig, ctx, ids) {
            return;
        }
        if self.session.state() != GameState::Loading {
            return;
        }
        if let Err(e) = self.session.loaded() {
            log::warn!("{}", e);
            return;
        }
        let Some(pose) = self
            .questions
            .as_ref()
            .and_then(|bank| bank.get(self.session.question_index()))
            .map(|q| q.pose_name())
        else {
            return;
        };
        // Settings may have changed since the last question.
        self.listener.set_timer(Self::timer_for(&self.config));
        self.listener.arm(pose.as_str());
        if let Some(ghost) = self.ghost.as_mut() {
            ghost.show(&mut ctx.scene, ctx.poses.library(), &pose);
        }
        self.emit_state(ctx);
    }

}

impl Default for AslQuiz {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for AslQuiz {
    fn init(&mut self, ctx: &mut EngineContext) {
        self.chart = Some(ReferenceChart::new(
            &mut self.rig,
            ctx,
            self.config.chart_hand,
            &self.config.chart_image,
        ));
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let frame = input.frame();
        for &event in input.iter() {
            self.handle_event(ctx, frame, event);
        }
        if let Some(placement) = self.placer.vr_default(
            frame,
            self.config.vr_anchor_distance,
            self.config.vr_anchor_drop,
        ) {
            self.place_anchor(ctx, placement);
        }
        self.try_begin(ctx);

        // Pose input only counts while answering.
        if self.session.state() == GameState::Answering {
            let dt_ms = ctx.dt as f64 * 1000.0;
            let outcome = self.listener.update(
                &ctx.poses,
                dt_ms,
                self.config.pose_debounce_ms,
                &mut self.cues,
            );
            if outcome == ListenerOutcome::Succeeded {
                self.advance(ctx);
            }
        }

        let tint = lerp_vec3(self.config.neutral(), self.config.success(), self.listener.progress());
        for hand in Handedness::BOTH {
            ctx.set_hand_tint(hand, tint);
        }

        for request in self.timers.tick(ctx.dt) {
            let kind = match request {
                SessionRequest::RestoreAnchors => EVENT_RESTORE_ANCHORS,
                SessionRequest::RoomCapture => EVENT_ROOM_CAPTURE,
            };
            ctx.emit_event(GameEvent::new(kind, 0.0, 0.0, 0.0));
        }

        if let Some(chart) = self.chart.as_ref() {
            chart.update(ctx, frame);
        }

        let completed = self.rig.tick(ctx);
        self.on_completions(ctx, &completed);

        for cue in self.cues.drain(..) {
            ctx.emit_sound(self.sfx.event(cue));
        }
    }

    fn on_manifest(&mut self, ctx: &mut EngineContext, manifest: &AssetManifest) {
        match manifest.settings::<QuizConfig>("quiz") {
            Ok(Some(config)) => self.config = config.sanitized(),
            Ok(None) => {}
            Err(e) => log::error!("{}", e),
        }
        self.sfx = SfxMap::from_registry(&SoundRegistry::from_manifest(manifest));
        if let Some(chart) = self.chart.as_mut() {
            chart.set_image(ctx, &self.config.chart_image);
            chart.set_hand(self.config.chart_hand);
        }
    }

    fn on_document(&mut self, ctx: &mut EngineContext, key: &str, json: &str) -> Result<(), DocumentError> {
        match key {
            DOC_QUESTIONS => {
                if self.session.state() != GameState::Start {
                    return Err(DocumentError::rejected(key, "quiz already started"));
                }
                let bank = QuestionBank::from_json(json).map_err(|e| DocumentError::rejected(key, e))?;
                log::info!("{} questions loaded", bank.len());
                self.questions = Some(bank);
                Ok(())
            }
            DOC_HAND_BONES => {
                let names: Vec<String> =
                    serde_json::from_str(json).map_err(|e| DocumentError::rejected(key, e))?;
                self.bones = JointBinding::from_bone_names(&names);
                if let Some(ghost) = self.ghost.as_mut() {
                    ghost.rebind(&mut self.rig, ctx, &self.bones);
                    ghost.refresh(&mut ctx.scene, ctx.poses.library());
                }
                Ok(())
            }
            _ => Err(DocumentError::Unknown(key.to_string())),
        }
    }
}

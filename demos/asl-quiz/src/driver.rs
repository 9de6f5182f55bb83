use std::f32::consts::TAU;
use glam::Vec3;
use fingerspell_engine::*;
use crate::config::QuizConfig;
use crate::questions::Question;
use crate::rig::Rig;

const LOADING_TEXT: &str = "Loading...";
const FAILED_TEXT: &str = "Failed to load model";

/// Scale and offset that make a model `target_height` tall (times `extra`),
/// centred over its pivot with its base on the pivot plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelFit {
    pub scale: f32,
    /// Model-space translation of the model under its pivot.
    pub offset: Vec3,
}

pub fn fit_model(min: Vec3, max: Vec3, target_height: f32, extra: f32) -> ModelFit {
    let height = max.y - min.y;
    let base = if height > 1e-6 {
        target_height / height
    } else {
        log::warn!("model has no height ({:?}..{:?}), not normalizing", min, max);
        1.0
    };
    let centre = (min + max) * 0.5;
    ModelFit {
        scale: base * extra,
        offset: Vec3::new(-centre.x, -min.y, -centre.z),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Idle,
    AwaitingModel { request: RequestId },
    /// Entrance animation running on the pivot.
    Entering { pivot: EntityId },
    Showing,
    Failed,
}

#[derive(Debug)]
struct PendingQuestion {
    prompt: String,
    scale: f32,
}

/// Puts each question's model and prompt on the anchor.
///
/// Every model hangs from a pivot group: the pivot carries the entrance and
/// exit tweens, the model under it only the fit offset. Tween completion ids
/// are pivot entity ids.
#[derive(Debug)]
pub struct QuestionDriver {
    anchor: EntityId,
    prompt: EntityId,
    current: Option<EntityId>,
    outgoing: Vec<EntityId>,
    pending: Option<PendingQuestion>,
    phase: DriverPhase,
}

impl QuestionDriver {
    /// Create the prompt text above `anchor`.
    pub fn attach(rig: &mut Rig, ctx: &mut EngineContext, anchor: EntityId, config: &QuizConfig) -> Self {
        let prompt = rig.spawn(ctx, Some(anchor), |e| {
            e.with_tag("prompt")
                .with_kind(EntityKind::Text)
                .with_translation(Vec3::new(0.0, config.prompt_height, 0.0))
                .with_label("")
        });
        Self {
            anchor,
            prompt,
            current: None,
            outgoing: Vec::new(),
            pending: None,
            phase: DriverPhase::Idle,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn prompt_entity(&self) -> EntityId {
        self.prompt
    }

    /// Pivot of the model on display (or entering).
    pub fn current_pivot(&self) -> Option<EntityId> {
        self.current
    }

    /// Retire the current model and ask the host for the next one.
    pub fn load(&mut self, rig: &mut Rig, ctx: &mut EngineContext, question: &Question, config: &QuizConfig) {
        self.exit_current(rig, ctx, config);
        self.show_loading(rig, ctx);

        let request = ctx.request_asset(question.model.as_str());
        log::info!("loading '{}' for '{}'", question.model, question.word);
        self.pending = Some(PendingQuestion {
            prompt: question.prompt(),
            scale: question.scale,
        });
        self.phase = DriverPhase::AwaitingModel { request };
    }

    /// Host reply with the model's bounds. Returns false for stale or
    /// unexpected replies.
    pub fn on_loaded(
        &mut self,
        rig: &mut Rig,
        ctx: &mut EngineContext,
        request: RequestId,
        min: Vec3,
        max: Vec3,
        config: &QuizConfig,
    ) -> bool {
        if self.phase != (DriverPhase::AwaitingModel { request }) {
            log::warn!("ignoring model reply {:?} (driver {:?})", request, self.phase);
            return false;
        }
        let extra = self.pending.as_ref().map_or(1.0, |p| p.scale);
        let fit = fit_model(min, max, config.model_target_height, extra);
        let rise = config.entrance_rise;

        let pivot = rig.spawn(ctx, Some(self.anchor), |e| {
            e.with_tag("question")
                .with_translation(Vec3::new(0.0, -rise, 0.0))
                .with_scale(Vec3::ZERO)
        });
        rig.spawn(ctx, Some(pivot), |e| {
            e.with_kind(EntityKind::Model { request })
                .with_translation(fit.offset)
        });

        let duration = config.entrance_duration;
        rig.tweens.add(
            pivot,
            Tween::scale_uniform(0.0, fit.scale, duration, Easing::BackOut).with_on_complete(pivot.0),
        );
        rig.tweens.add(pivot, Tween::translation_y(-rise, 0.0, duration, Easing::CubicOut));
        rig.tweens.add(pivot, Tween::yaw(0.0, TAU, duration, Easing::SineInOut));

        self.current = Some(pivot);
        self.phase = DriverPhase::Entering { pivot };
        true
    }

    /// Host could not load the model. Returns false if `request` is not
    /// the one being waited on.
    pub fn on_failed(&mut self, rig: &mut Rig, ctx: &mut EngineContext, request: RequestId) -> bool {
        if self.phase != (DriverPhase::AwaitingModel { request }) {
            log::warn!("ignoring failure for {:?} (driver {:?})", request, self.phase);
            return false;
        }
        log::error!("model load {:?} failed", request);
        self.pending = None;
        self.show_text(rig, ctx, FAILED_TEXT);
        self.phase = DriverPhase::Failed;
        true
    }

    /// Feed tween completions. Despawns retired models and returns true when
    /// the entrance just finished and the prompt is showing.
    pub fn on_completions(&mut self, rig: &mut Rig, ctx: &mut EngineContext, ids: &[u32]) -> bool {
        let (done, keep): (Vec<EntityId>, Vec<EntityId>) =
            self.outgoing.drain(..).partition(|pivot| ids.contains(&pivot.0));
        self.outgoing = keep;
        for pivot in done {
            rig.despawn(ctx, pivot);
        }

        match self.phase {
            DriverPhase::Entering { pivot } if ids.contains(&pivot.0) => {
                let prompt = self.pending.take().map(|p| p.prompt).unwrap_or_default();
                self.show_text(rig, ctx, &prompt);
                self.phase = DriverPhase::Showing;
                true
            }
            _ => false,
        }
    }

    /// Retire the model and leave `message` on the prompt.
    pub fn finish(&mut self, rig: &mut Rig, ctx: &mut EngineContext, message: &str, config: &QuizConfig) {
        self.exit_current(rig, ctx, config);
        self.show_text(rig, ctx, message);
        self.phase = DriverPhase::Idle;
    }

    fn exit_current(&mut self, rig: &mut Rig, ctx: &EngineContext, config: &QuizConfig) {
        let Some(pivot) = self.current.take() else { return };
        let (scale, y) = ctx
            .scene
            .get(pivot)
            .map(|e| (e.local.scale.x, e.local.translation.y))
            .unwrap_or((0.0, 0.0));
        let duration = config.exit_duration;
        rig.tweens.add(
            pivot,
            Tween::scale_uniform(scale, 0.0, duration, Easing::BackIn).with_on_complete(pivot.0),
        );
        rig.tweens.add(pivot, Tween::translation_y(y, y - config.exit_drop, duration, Easing::QuadIn));
        rig.tweens.cancel(pivot, TweenChannel::Rotation);
        self.outgoing.push(pivot);
    }

    fn show_loading(&mut self, rig: &mut Rig, ctx: &mut EngineContext) {
        ctx.scene.set_label(self.prompt, LOADING_TEXT);
        rig.tweens.add(
            self.prompt,
            Tween::opacity(1.0, 0.3, 0.6, Easing::SineInOut).with_loop(TweenLoop::PingPong),
        );
    }

    fn show_text(&mut self, rig: &mut Rig, ctx: &mut EngineContext, text: &str) {
        ctx.scene.set_label(self.prompt, text);
        rig.tweens.cancel(self.prompt, TweenChannel::Opacity);
        if let Some(entity) = ctx.scene.get_mut(self.prompt) {
            entity.opacity = 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(word: &str, answer: &str) -> Question {
        Question {
            word: word.to_string(),
            answer: answer.to_string(),
            model: format!("models/{}.glb", word),
            scale: 1.0,
        }
    }

    fn setup() -> (EngineContext, Rig, QuestionDriver, QuizConfig) {
        let mut ctx = EngineContext::new();
        let mut rig = Rig::new();
        let config = QuizConfig::default();
        let anchor = rig.spawn(&mut ctx, None, |e| e.with_tag("anchor"));
        let driver = QuestionDriver::attach(&mut rig, &mut ctx, anchor, &config);
        (ctx, rig, driver, config)
    }

    /// Tick until a completion is reported or `max_frames` pass.
    fn run(ctx: &mut EngineContext, rig: &mut Rig, driver: &mut QuestionDriver, max_frames: usize) -> bool {
        ctx.dt = 0.05;
        for _ in 0..max_frames {
            let ids = rig.tick(ctx);
            if driver.on_completions(rig, ctx, &ids) {
                return true;
            }
        }
        false
    }

    #[test]
    fn fit_normalizes_height_and_grounds_base() {
        let fit = fit_model(Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, 5.0, 2.0), 0.3, 2.0);
        assert!((fit.scale - 0.2).abs() < 1e-6);
        assert_eq!(fit.offset, Vec3::new(-1.0, -2.0, -1.0));

        let flat = fit_model(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), 0.3, 1.5);
        assert_eq!(flat.scale, 1.5);
    }

    #[test]
    fn load_reply_entrance_then_prompt() {
        let (mut ctx, mut rig, mut driver, config) = setup();
        driver.load(&mut rig, &mut ctx, &question("lamp", "a"), &config);
        assert_eq!(ctx.scene.label(driver.prompt_entity()), Some(LOADING_TEXT));
        let request = ctx.requests[0].id;
        assert_eq!(driver.phase(), DriverPhase::AwaitingModel { request });

        let min = Vec3::new(-0.5, 0.0, -0.5);
        let max = Vec3::new(0.5, 2.0, 0.5);
        assert!(driver.on_loaded(&mut rig, &mut ctx, request, min, max, &config));
        assert_eq!(ctx.scene.count_kind(EntityKind::Model { request }), 1);

        assert!(run(&mut ctx, &mut rig, &mut driver, 100));
        assert_eq!(driver.phase(), DriverPhase::Showing);
        assert_eq!(ctx.scene.label(driver.prompt_entity()), Some("l_mp"));

        let pivot = driver.current_pivot().unwrap();
        let scale = ctx.scene.get(pivot).unwrap().local.scale.x;
        assert!((scale - 0.15).abs() < 1e-4, "{}", scale);
        assert_eq!(ctx.scene.get(driver.prompt_entity()).unwrap().opacity, 1.0);
    }

    #[test]
    fn stale_reply_is_ignored() {
        let (mut ctx, mut rig, mut driver, config) = setup();
        driver.load(&mut rig, &mut ctx, &question("lamp", "a"), &config);
        let first = ctx.requests[0].id;
        ctx.clear_frame_data();

        // Superseded before the reply arrives.
        driver.load(&mut rig, &mut ctx, &question("cat", "t"), &config);
        assert!(!driver.on_loaded(&mut rig, &mut ctx, first, Vec3::ZERO, Vec3::ONE, &config));
        assert!(!driver.on_failed(&mut rig, &mut ctx, first));
        assert_eq!(ctx.scene.count_kind(EntityKind::Model { request: first }), 0);
        assert!(matches!(driver.phase(), DriverPhase::AwaitingModel { .. }));
    }

    #[test]
    fn failure_shows_message() {
        let (mut ctx, mut rig, mut driver, config) = setup();
        driver.load(&mut rig, &mut ctx, &question("lamp", "a"), &config);
        let request = ctx.requests[0].id;
        assert!(driver.on_failed(&mut rig, &mut ctx, request));
        assert_eq!(driver.phase(), DriverPhase::Failed);
        assert_eq!(ctx.scene.label(driver.prompt_entity()), Some(FAILED_TEXT));
        assert!(!rig.tweens.is_animating(driver.prompt_entity()));
    }

    #[test]
    fn retired_model_is_despawned_after_exit() {
        let (mut ctx, mut rig, mut driver, config) = setup();
        driver.load(&mut rig, &mut ctx, &question("lamp", "a"), &config);
        let request = ctx.requests[0].id;
        driver.on_loaded(&mut rig, &mut ctx, request, Vec3::ZERO, Vec3::ONE, &config);
        assert!(run(&mut ctx, &mut rig, &mut driver, 100));
        let old = driver.current_pivot().unwrap();

        driver.load(&mut rig, &mut ctx, &question("cat", "t"), &config);
        assert!(ctx.scene.get(old).is_some());
        ctx.dt = 0.05;
        for _ in 0..40 {
            let ids = rig.tick(&mut ctx);
            driver.on_completions(&mut rig, &mut ctx, &ids);
        }
        assert!(ctx.scene.get(old).is_none());
        assert_eq!(ctx.scene.count_kind(EntityKind::Model { request }), 0);
    }
}

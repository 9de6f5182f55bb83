use glam::Vec3;
use fingerspell_engine::Handedness;
use serde::Deserialize;

/// Quiz tunables. Read from the `"quiz"` settings section of the asset
/// manifest; every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// How long a pose must be held to count as an answer.
    pub charge_threshold_ms: f64,
    /// Charge drains this many times faster than it fills.
    pub decay_multiplier: f64,
    /// Matcher smoothing window passed to `is_pose`.
    pub pose_debounce_ms: f32,

    /// Height (m) every question model is normalized to, before `question.scale`.
    pub model_target_height: f32,
    pub entrance_duration: f32,
    /// How far below the anchor a model starts its entrance rise (m).
    pub entrance_rise: f32,
    pub exit_duration: f32,
    pub exit_drop: f32,

    /// Prompt text height above the anchor (m).
    pub prompt_height: f32,
    /// Progress bar offset from the anchor (m).
    pub progress_offset: [f32; 3],
    /// Ghost hand offset from the anchor (m).
    pub ghost_offset: [f32; 3],
    pub chart_image: String,
    /// Hand that carries the reference chart.
    pub chart_hand: Handedness,
    /// Which recorded variant the ghost hand shows.
    pub ghost_hand: Handedness,

    /// VR has no hit-test: the anchor goes this far in front of the viewer...
    pub vr_anchor_distance: f32,
    /// ...and this far below eye level.
    pub vr_anchor_drop: f32,

    /// Seconds after an AR session starts before persistent anchors are restored.
    pub restore_anchor_delay: f32,
    /// Seconds after an AR session starts before room capture is offered.
    pub room_capture_delay: f32,

    pub success_color: [f32; 3],
    pub neutral_color: [f32; 3],
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            charge_threshold_ms: 1500.0,
            decay_multiplier: 1.5,
            pose_debounce_ms: 250.0,
            model_target_height: 0.3,
            entrance_duration: 1.2,
            entrance_rise: 0.15,
            exit_duration: 0.5,
            exit_drop: 0.15,
            prompt_height: 0.45,
            progress_offset: [0.0, -0.08, 0.0],
            ghost_offset: [0.3, 0.15, 0.0],
            chart_image: "img/asl_signs.png".to_string(),
            chart_hand: Handedness::Left,
            ghost_hand: Handedness::Right,
            vr_anchor_distance: 1.0,
            vr_anchor_drop: 0.4,
            restore_anchor_delay: 1.0,
            room_capture_delay: 5.0,
            // 0x66941B
            success_color: [0.4, 0.58, 0.106],
            neutral_color: [0.0, 0.0, 0.0],
        }
    }
}

impl QuizConfig {
    pub fn success(&self) -> Vec3 {
        Vec3::from_array(self.success_color)
    }

    pub fn neutral(&self) -> Vec3 {
        Vec3::from_array(self.neutral_color)
    }

    /// Reject values that would break the charge timer or the model fit.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.charge_threshold_ms > 0.0) {
            log::warn!("charge_threshold_ms must be positive, using {}", defaults.charge_threshold_ms);
            self.charge_threshold_ms = defaults.charge_threshold_ms;
        }
        if !(self.decay_multiplier >= 0.0) {
            log::warn!("decay_multiplier must be non-negative, using {}", defaults.decay_multiplier);
            self.decay_multiplier = defaults.decay_multiplier;
        }
        if !(self.model_target_height > 0.0) {
            log::warn!("model_target_height must be positive, using {}", defaults.model_target_height);
            self.model_target_height = defaults.model_target_height;
        }
        self
    }
}

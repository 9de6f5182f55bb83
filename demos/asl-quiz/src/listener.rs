use fingerspell_engine::{Handedness, PoseSource};
use crate::charge::PoseChargeTimer;
use crate::sfx::Cue;

/// What one listener update amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListenerOutcome {
    /// Not armed; nothing changed.
    Idle,
    Charging { progress: f32 },
    Decaying { progress: f32 },
    /// The pose was held long enough. The listener has disarmed itself.
    Succeeded,
}

/// Watches both hands for the current answer pose and charges the hold timer.
#[derive(Debug)]
pub struct PoseListener {
    timer: PoseChargeTimer,
    pose: Option<String>,
    charging_audio: bool,
}

impl PoseListener {
    pub fn new(timer: PoseChargeTimer) -> Self {
        Self {
            timer,
            pose: None,
            charging_audio: false,
        }
    }

    /// Start listening for `pose` with an empty timer.
    pub fn arm(&mut self, pose: impl Into<String>) {
        let pose = pose.into();
        log::info!("listening for '{}'", pose);
        self.pose = Some(pose);
        self.timer.reset();
    }

    /// Swap the hold timer, e.g. after new settings arrived. The fill starts
    /// from empty.
    pub fn set_timer(&mut self, timer: PoseChargeTimer) {
        self.timer = timer;
    }

    /// Stop listening. Silences the charge loop if it was playing.
    pub fn disarm(&mut self, cues: &mut Vec<Cue>) {
        self.pose = None;
        self.silence(cues);
    }

    pub fn is_armed(&self) -> bool {
        self.pose.is_some()
    }

    pub fn armed_pose(&self) -> Option<&str> {
        self.pose.as_deref()
    }

    /// Timer fill in `[0, 1]`; stays full after a success until re-armed.
    pub fn progress(&self) -> f32 {
        self.timer.progress()
    }

    /// Stop the charge loop if it is playing; stays armed.
    pub fn silence(&mut self, cues: &mut Vec<Cue>) {
        if self.charging_audio {
            cues.push(Cue::StopCharging);
            self.charging_audio = false;
        }
    }

    /// Advance one frame. Either hand may answer.
    pub fn update<P: PoseSource>(
        &mut self,
        poses: &P,
        dt_ms: f64,
        debounce_ms: f32,
        cues: &mut Vec<Cue>,
    ) -> ListenerOutcome {
        let Some(pose) = self.pose.as_deref() else {
            return ListenerOutcome::Idle;
        };

        let matched = Handedness::BOTH
            .iter()
            .any(|&hand| poses.is_pose(hand, pose, debounce_ms));

        if !matched {
            self.silence(cues);
            self.timer.decay(dt_ms);
            return ListenerOutcome::Decaying { progress: self.timer.progress() };
        }

        if !self.charging_audio {
            cues.push(Cue::StartCharging);
            self.charging_audio = true;
        }

        if self.timer.charge(dt_ms) {
            log::info!("pose '{}' held", pose);
            self.disarm(cues);
            cues.push(Cue::Correct);
            return ListenerOutcome::Succeeded;
        }
        ListenerOutcome::Charging { progress: self.timer.progress() }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// Scripted pose source: reports `pose` on `hand` while `active` is set.
    pub(crate) struct ScriptedPoses {
        pub hand: Handedness,
        pub pose: String,
        pub active: Cell<bool>,
    }

    impl ScriptedPoses {
        pub(crate) fn new(hand: Handedness, pose: &str) -> Self {
            Self {
                hand,
                pose: pose.to_string(),
                active: Cell::new(false),
            }
        }

        pub(crate) fn set(&self, active: bool) {
            self.active.set(active);
        }
    }

    impl PoseSource for ScriptedPoses {
        fn is_pose(&self, hand: Handedness, pose: &str, _debounce_ms: f32) -> bool {
            self.active.get() && hand == self.hand && pose == self.pose
        }
    }

    fn listener() -> PoseListener {
        PoseListener::new(PoseChargeTimer::new(1500.0, 1.5))
    }

    #[test]
    fn idle_until_armed() {
        let poses = ScriptedPoses::new(Handedness::Right, "asl a");
        poses.set(true);
        let mut l = listener();
        let mut cues = Vec::new();
        assert_eq!(l.update(&poses, 16.0, 250.0, &mut cues), ListenerOutcome::Idle);
        assert!(cues.is_empty());
        assert_eq!(l.progress(), 0.0);
    }

    #[test]
    fn either_hand_answers() {
        for hand in Handedness::BOTH {
            let poses = ScriptedPoses::new(hand, "asl a");
            poses.set(true);
            let mut l = listener();
            l.arm("asl a");
            let mut cues = Vec::new();
            assert!(matches!(
                l.update(&poses, 100.0, 250.0, &mut cues),
                ListenerOutcome::Charging { .. }
            ));
        }
    }

    #[test]
    fn charging_audio_cues_are_idempotent() {
        let poses = ScriptedPoses::new(Handedness::Left, "asl b");
        let mut l = listener();
        l.arm("asl b");
        let mut cues = Vec::new();

        poses.set(true);
        l.update(&poses, 10.0, 250.0, &mut cues);
        l.update(&poses, 10.0, 250.0, &mut cues);
        assert_eq!(cues, vec![Cue::StartCharging]);

        poses.set(false);
        l.update(&poses, 10.0, 250.0, &mut cues);
        l.update(&poses, 10.0, 250.0, &mut cues);
        assert_eq!(cues, vec![Cue::StartCharging, Cue::StopCharging]);
    }

    #[test]
    fn success_disarms_and_chimes() {
        let poses = ScriptedPoses::new(Handedness::Right, "asl c");
        poses.set(true);
        let mut l = listener();
        l.arm("asl c");
        let mut cues = Vec::new();

        let mut outcome = ListenerOutcome::Idle;
        for _ in 0..150 {
            outcome = l.update(&poses, 10.0, 250.0, &mut cues);
        }
        assert_eq!(outcome, ListenerOutcome::Succeeded);
        assert!(!l.is_armed());
        assert_eq!(cues, vec![Cue::StartCharging, Cue::StopCharging, Cue::Correct]);
        assert_eq!(l.progress(), 1.0);

        // Re-arming starts from empty.
        l.arm("asl d");
        assert_eq!(l.progress(), 0.0);
    }

    #[test]
    fn swapped_timer_sets_new_threshold() {
        let poses = ScriptedPoses::new(Handedness::Right, "asl e");
        poses.set(true);
        let mut l = listener();
        l.set_timer(PoseChargeTimer::new(100.0, 1.5));
        l.arm("asl e");
        let mut cues = Vec::new();
        assert!(matches!(l.update(&poses, 50.0, 250.0, &mut cues), ListenerOutcome::Charging { .. }));
        assert_eq!(l.update(&poses, 50.0, 250.0, &mut cues), ListenerOutcome::Succeeded);
    }

    #[test]
    fn wrong_pose_only_decays() {
        let poses = ScriptedPoses::new(Handedness::Right, "asl x");
        poses.set(true);
        let mut l = listener();
        l.arm("asl a");
        let mut cues = Vec::new();
        for _ in 0..200 {
            assert!(matches!(
                l.update(&poses, 16.0, 250.0, &mut cues),
                ListenerOutcome::Decaying { progress } if progress == 0.0
            ));
        }
        assert!(l.is_armed());
        assert!(cues.is_empty());
    }
}

use fingerspell_engine::{SoundEvent, SoundRegistry};

/// Audio feedback the quiz can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Start the looping charge sound.
    StartCharging,
    StopCharging,
    Correct,
    GameOver,
}

// Used when the manifest does not name the sounds.
const DEFAULT_CHARGING: u32 = 1;
const DEFAULT_CORRECT: u32 = 2;
const DEFAULT_GAMEOVER: u32 = 3;

/// Maps cues to the host's sound ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SfxMap {
    charging: SoundEvent,
    correct: SoundEvent,
    gameover: SoundEvent,
}

impl Default for SfxMap {
    fn default() -> Self {
        Self {
            charging: SoundEvent(DEFAULT_CHARGING),
            correct: SoundEvent(DEFAULT_CORRECT),
            gameover: SoundEvent(DEFAULT_GAMEOVER),
        }
    }
}

impl SfxMap {
    pub fn from_registry(registry: &SoundRegistry) -> Self {
        let defaults = Self::default();
        let lookup = |name: &str, fallback: SoundEvent| {
            registry.get(name).unwrap_or_else(|| {
                log::warn!("sound '{}' not in manifest, using id {}", name, fallback.0);
                fallback
            })
        };
        Self {
            charging: lookup("charging", defaults.charging),
            correct: lookup("correct", defaults.correct),
            gameover: lookup("gameover", defaults.gameover),
        }
    }

    pub fn event(&self, cue: Cue) -> SoundEvent {
        match cue {
            Cue::StartCharging => self.charging,
            Cue::StopCharging => self.charging.stop(),
            Cue::Correct => self.correct,
            Cue::GameOver => self.gameover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fingerspell_engine::AssetManifest;

    #[test]
    fn stop_uses_stop_flag_on_charging_id() {
        let map = SfxMap::default();
        assert_eq!(map.event(Cue::StartCharging), SoundEvent(1));
        assert!(map.event(Cue::StopCharging).is_stop());
        assert_eq!(map.event(Cue::StopCharging).sound_id(), 1);
    }

    #[test]
    fn manifest_ids_override_defaults() {
        let manifest = AssetManifest::from_json(
            r#"{ "sounds": { "correct": { "path": "audio/correct.mp3", "event_id": 9 } } }"#,
        )
        .unwrap();
        let map = SfxMap::from_registry(&SoundRegistry::from_manifest(&manifest));
        assert_eq!(map.event(Cue::Correct), SoundEvent(9));
        assert_eq!(map.event(Cue::GameOver), SoundEvent(3));
    }
}

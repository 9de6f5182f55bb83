use bytemuck::{Pod, Zeroable};

/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// A sound event emitted by the game logic.
/// The low seven bits name a sound registered in the host's audio manager;
/// the high bit asks the host to stop that sound instead of playing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

impl SoundEvent {
    pub const STOP_FLAG: u32 = 0x80;

    /// The stop command for this sound.
    pub fn stop(self) -> Self {
        Self(self.0 | Self::STOP_FLAG)
    }

    pub fn is_stop(self) -> bool {
        self.0 & Self::STOP_FLAG != 0
    }

    /// Sound id without the stop flag.
    pub fn sound_id(self) -> u32 {
        self.0 & !Self::STOP_FLAG
    }
}

/// A game event communicated from Rust to the host via the shared buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// Handle for an asynchronous asset load performed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u32);

/// A pending asset load the host must fulfil, answered later with
/// `InputEvent::AssetLoaded` or `InputEvent::AssetFailed`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub id: RequestId,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_flag_round_trips_sound_id() {
        let charging = SoundEvent(3);
        assert!(!charging.is_stop());
        let stop = charging.stop();
        assert!(stop.is_stop());
        assert_eq!(stop.sound_id(), 3);
        assert_eq!(stop.0, 0x83);
    }
}

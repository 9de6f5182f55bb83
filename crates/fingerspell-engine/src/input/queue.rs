use glam::{Quat, Vec3};
use crate::api::types::RequestId;
use crate::hands::joint::Handedness;
use super::frame::XrFrame;

/// Which kind of immersive session the host started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrMode {
    Ar,
    Vr,
}

impl XrMode {
    /// Decode the host's mode id (0 = AR, 1 = VR).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(XrMode::Ar),
            1 => Some(XrMode::Vr),
            _ => None,
        }
    }
}

/// Discrete events pushed by the host between ticks.
/// Continuous tracking (head, hands, hit-tests) lives in `XrFrame` instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// An immersive session began.
    SessionStarted { mode: XrMode },
    SessionEnded,
    /// A controller or tracked hand appeared.
    ControllerConnected { hand: Handedness },
    ControllerDisconnected { hand: Handedness },
    /// Select/pinch released on a hand.
    PinchEnd { hand: Handedness },
    /// Squeeze pressed on a hand: discard the placed anchor.
    SqueezeStart { hand: Handedness },
    /// The host restored a persistent anchor from a previous session.
    AnchorRestored { position: Vec3, orientation: Quat },
    /// Number of planes the platform currently reports.
    PlanesDetected { count: u32 },
    /// A requested model finished loading; bounds are in model space.
    AssetLoaded { request: RequestId, min: Vec3, max: Vec3 },
    /// A requested model could not be loaded.
    AssetFailed { request: RequestId },
    /// A custom event from the page UI.
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events plus the current tracking snapshot.
/// JS writes into it; Rust reads it during `Game::update` and the runner
/// drains the events after each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
    frame: XrFrame,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            frame: XrFrame::new(),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Latest tracking snapshot.
    pub fn frame(&self) -> &XrFrame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut XrFrame {
        &mut self.frame
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::SessionStarted { mode: XrMode::Ar });
        q.push(InputEvent::PinchEnd { hand: Handedness::Right });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn drain_keeps_tracking_snapshot() {
        let mut q = InputQueue::new();
        q.frame_mut().viewer = Some(crate::input::frame::Pose::IDENTITY);
        q.push(InputEvent::PlanesDetected { count: 3 });
        q.drain();
        assert!(q.frame().viewer.is_some());
    }

    #[test]
    fn custom_event() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 7, a: 1.5, b: 2.5, c: 3.5 });
        let events = q.drain();
        match events[0] {
            InputEvent::Custom { kind, a, b, c } => {
                assert_eq!(kind, 7);
                assert_eq!((a, b, c), (1.5, 2.5, 3.5));
            }
            _ => panic!("Expected Custom event"),
        }
    }

    #[test]
    fn mode_codes() {
        assert_eq!(XrMode::from_code(0), Some(XrMode::Ar));
        assert_eq!(XrMode::from_code(1), Some(XrMode::Vr));
        assert_eq!(XrMode::from_code(9), None);
    }
}

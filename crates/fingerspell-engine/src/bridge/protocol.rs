/// Shared frame buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Instances: max_instances × 20 floats]
/// [Sounds: max_sounds × 1 float]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use glam::Vec3;
use crate::api::game::GameConfig;
use crate::api::types::{GameEvent, SoundEvent};
use crate::renderer::instance::RenderInstance;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_SOUNDS: usize = 4;
pub const HEADER_SOUND_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_PROTOCOL_VERSION: usize = 8;
/// Left hand tint r, g, b.
pub const HEADER_TINT_LEFT: usize = 9;
/// Right hand tint r, g, b.
pub const HEADER_TINT_RIGHT: usize = 12;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per render instance (wire format).
pub const INSTANCE_FLOATS: usize = RenderInstance::FLOATS;

/// Floats per game event: kind, a, b, c (wire format).
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    /// Maximum sound events per frame.
    pub max_sounds: usize,
    /// Maximum game events per frame.
    pub max_events: usize,

    pub instance_data_floats: usize,
    pub sound_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where sound data begins.
    pub sound_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

/// One frame's worth of output, borrowed from the runner.
pub struct FrameData<'a> {
    pub frame_counter: u32,
    pub instances: &'a [RenderInstance],
    pub sounds: &'a [SoundEvent],
    pub events: &'a [GameEvent],
    pub hand_tints: [Vec3; 2],
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_instances: usize, max_sounds: usize, max_events: usize) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let instance_data_offset = HEADER_FLOATS;
        let sound_data_offset = instance_data_offset + instance_data_floats;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_instances,
            max_sounds,
            max_events,
            instance_data_floats,
            sound_data_floats,
            event_data_floats,
            instance_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_instances, config.max_sounds, config.max_events)
    }

    /// Write the capacity fields of the header. Done once at init.
    pub fn write_header(&self, buf: &mut [f32]) {
        if buf.len() < HEADER_FLOATS {
            return;
        }
        buf[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        buf[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        buf[HEADER_MAX_EVENTS] = self.max_events as f32;
        buf[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    }

    /// Pack a frame into `buf`. Sections are truncated to capacity; returns
    /// false (and writes nothing) if `buf` is smaller than the layout.
    pub fn pack(&self, frame: &FrameData, buf: &mut [f32]) -> bool {
        if buf.len() < self.buffer_total_floats {
            log::warn!(
                "frame buffer too small: {} < {} floats",
                buf.len(),
                self.buffer_total_floats
            );
            return false;
        }
        self.write_header(buf);

        let instances = &frame.instances[..frame.instances.len().min(self.max_instances)];
        let floats: &[f32] = bytemuck::cast_slice(instances);
        buf[self.instance_data_offset..self.instance_data_offset + floats.len()]
            .copy_from_slice(floats);

        let sounds = &frame.sounds[..frame.sounds.len().min(self.max_sounds)];
        for (slot, sound) in buf[self.sound_data_offset..].iter_mut().zip(sounds) {
            *slot = sound.0 as f32;
        }

        let events = &frame.events[..frame.events.len().min(self.max_events)];
        let floats: &[f32] = bytemuck::cast_slice(events);
        buf[self.event_data_offset..self.event_data_offset + floats.len()]
            .copy_from_slice(floats);

        buf[HEADER_FRAME_COUNTER] = frame.frame_counter as f32;
        buf[HEADER_INSTANCE_COUNT] = instances.len() as f32;
        buf[HEADER_SOUND_COUNT] = sounds.len() as f32;
        buf[HEADER_EVENT_COUNT] = events.len() as f32;
        buf[HEADER_TINT_LEFT..HEADER_TINT_LEFT + 3].copy_from_slice(&frame.hand_tints[0].to_array());
        buf[HEADER_TINT_RIGHT..HEADER_TINT_RIGHT + 3].copy_from_slice(&frame.hand_tints[1].to_array());
        true
    }
}

use bytemuck::{Pod, Zeroable};
use crate::components::entity::{Entity, EntityKind};

/// Per-entity render data written to the shared buffer for the three.js host.
/// Must match the TypeScript protocol: 20 floats = 80 bytes stride.
///
/// The host keeps one scene object per `entity_id`, creates it on first
/// sight and drops it when the id stops appearing.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub entity_id: f32,
    /// `EntityKind::code()`.
    pub kind: f32,
    /// Request id of the model for `Model` entities, 0 otherwise.
    pub asset: f32,
    pub opacity: f32,
    /// World position.
    pub position: [f32; 3],
    /// World rotation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// RGB multiplier.
    pub tint: [f32; 3],
    pub _pad: [f32; 3],
}

impl RenderInstance {
    pub const FLOATS: usize = 20;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_entity(entity: &Entity) -> Self {
        let asset = match entity.kind {
            EntityKind::Model { request } => request.0 as f32,
            _ => 0.0,
        };
        Self {
            entity_id: entity.id.0 as f32,
            kind: entity.kind.code(),
            asset,
            opacity: entity.opacity,
            position: entity.world.translation.to_array(),
            rotation: entity.world.rotation.to_array(),
            scale: entity.world.scale.to_array(),
            tint: entity.tint.to_array(),
            _pad: [0.0; 3],
        }
    }
}

/// Render buffer containing all instances for the current frame.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for SharedArrayBuffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

use glam::{Quat, Vec3};
use crate::api::types::{EntityId, RequestId};
use crate::extensions::transform::Transform;

/// How the host should draw an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityKind {
    /// Pure transform node, nothing drawn.
    #[default]
    Group,
    /// A model loaded by the host for the given request.
    Model { request: RequestId },
    /// Billboard text; content lives in `Entity.label`.
    Text,
    /// Small sphere (joint markers, hit-test reticles).
    Marker,
    /// Flat box sized by the entity scale (progress bar pieces).
    Panel,
    /// Textured quad; image path lives in `Entity.label`.
    Image,
}

impl EntityKind {
    /// Numeric code written into render instances.
    pub fn code(self) -> f32 {
        match self {
            EntityKind::Group => 0.0,
            EntityKind::Model { .. } => 1.0,
            EntityKind::Text => 2.0,
            EntityKind::Marker => 3.0,
            EntityKind::Panel => 4.0,
            EntityKind::Image => 5.0,
        }
    }
}

/// Fat Entity — a single struct with optional components.
/// Designed for simplicity over ECS purity.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Inactive entities are not rendered.
    pub active: bool,
    pub kind: EntityKind,
    /// Transform relative to the parent in the `TransformGraph` (or world).
    pub local: Transform,
    /// World transform, written by `TransformGraph::propagate`.
    pub world: Transform,
    /// RGB multiplier applied to all materials.
    pub tint: Vec3,
    pub opacity: f32,
    /// Text content or image path.
    pub label: Option<String>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            kind: EntityKind::Group,
            local: Transform::IDENTITY,
            world: Transform::IDENTITY,
            tint: Vec3::ONE,
            opacity: 1.0,
            label: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets both local and world; the graph overwrites world for children.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.local.translation = translation;
        self.world.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.local.rotation = rotation;
        self.world.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.local.scale = scale;
        self.world.scale = scale;
        self
    }

    pub fn with_tint(mut self, tint: Vec3) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

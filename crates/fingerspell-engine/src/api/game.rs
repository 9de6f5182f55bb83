use glam::Vec3;
use crate::core::scene::Scene;
use crate::api::types::{AssetRequest, EntityId, GameEvent, RequestId, SoundEvent};
use crate::assets::manifest::AssetManifest;
use crate::components::entity::Entity;
use crate::hands::joint::Handedness;
use crate::hands::matcher::{MatcherConfig, PoseMatcher};
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Maximum number of render instances (default: 256).
    pub max_instances: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Largest frame delta in seconds; longer gaps (tab hidden, session
    /// paused) are clamped to this.
    pub max_dt: f32,
    pub matcher: MatcherConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_instances: 256,
            max_sounds: 32,
            max_events: 32,
            max_dt: 0.25,
            matcher: MatcherConfig::default(),
        }
    }
}

/// A named JSON document the game could not accept.
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("no handler for document '{0}'")]
    Unknown(String),

    #[error("document '{key}' rejected: {message}")]
    Rejected { key: String, message: String },
}

impl DocumentError {
    pub fn rejected(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Rejected {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. `ctx.dt` holds the frame delta in seconds and
    /// `ctx.poses` has already classified this frame's hands.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only render pass for custom render commands.
    fn render(&self, _ctx: &mut RenderContext) {}

    /// Called after the host loads the asset manifest.
    fn on_manifest(&mut self, _ctx: &mut EngineContext, _manifest: &AssetManifest) {}

    /// A named JSON document fetched by the host (questions, bone lists, ...).
    fn on_document(
        &mut self,
        _ctx: &mut EngineContext,
        key: &str,
        _json: &str,
    ) -> Result<(), DocumentError> {
        Err(DocumentError::Unknown(key.to_string()))
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    /// Asset loads issued this frame, drained by the runner.
    pub requests: Vec<AssetRequest>,
    pub poses: PoseMatcher,
    /// RGB multiplier the host applies to each tracked hand's mesh.
    pub hand_tints: [Vec3; 2],
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Seconds since the session clock started.
    pub elapsed: f64,
    next_id: u32,
    next_request: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            sounds: Vec::new(),
            events: Vec::new(),
            requests: Vec::new(),
            poses: PoseMatcher::default(),
            hand_tints: [Vec3::ONE; 2],
            dt: 0.0,
            elapsed: 0.0,
            next_id: 1,
            next_request: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn an entity built from a freshly allocated id.
    pub fn spawn(&mut self, build: impl FnOnce(Entity) -> Entity) -> EntityId {
        let id = self.next_id();
        self.scene.spawn(build(Entity::new(id)))
    }

    /// Emit a sound event to be forwarded to the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Ask the host to load an asset. The reply arrives as an
    /// `AssetLoaded`/`AssetFailed` input carrying the returned id.
    pub fn request_asset(&mut self, path: impl Into<String>) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        let path = path.into();
        log::debug!("asset request {:?}: {}", id, path);
        self.requests.push(AssetRequest { id, path });
        id
    }

    pub fn set_hand_tint(&mut self, hand: Handedness, tint: Vec3) {
        self.hand_tints[hand.index()] = tint;
    }

    /// Clear per-frame transient data (sounds, events, requests).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
        self.requests.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::EntityKind;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.spawn(|e| e.with_kind(EntityKind::Marker));
        assert!(b.0 > a.0);
        assert_eq!(ctx.scene.get(b).map(|e| e.kind), Some(EntityKind::Marker));
    }

    #[test]
    fn requests_get_distinct_ids_and_clear_per_frame() {
        let mut ctx = EngineContext::new();
        let a = ctx.request_asset("models/a.glb");
        let b = ctx.request_asset("models/b.glb");
        assert_ne!(a, b);
        assert_eq!(ctx.requests.len(), 2);
        assert_eq!(ctx.requests[1].path, "models/b.glb");

        ctx.emit_sound(SoundEvent(1));
        ctx.clear_frame_data();
        assert!(ctx.requests.is_empty());
        assert!(ctx.sounds.is_empty());
        // Ids keep increasing across frames.
        assert!(ctx.request_asset("c").0 > b.0);
    }
}

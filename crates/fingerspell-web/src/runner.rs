use fingerspell_engine::{
    Game, GameConfig, EngineContext, RenderContext,
    InputEvent, InputQueue, RenderBuffer,
    FrameClock, ProtocolLayout, FrameData, LabelSync,
    AssetManifest, AssetRequest, PoseLibrary,
    Handedness, HandSkeleton, Pose,
};
use fingerspell_engine::bridge::labels::requests_json;
use fingerspell_engine::systems::render::build_render_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game (e.g., `asl-quiz`) creates a `thread_local!` GameRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    clock: FrameClock,
    config: GameConfig,
    layout: ProtocolLayout,
    labels: LabelSync,
    initialized: bool,
    frame_counter: u32,
    /// Asset loads not yet picked up by the host.
    pending_requests: Vec<AssetRequest>,
    /// Flat buffer of sound event IDs for SharedArrayBuffer reads.
    sound_buffer: Vec<u8>,
    /// Whole frame packed per `ProtocolLayout`.
    frame_buffer: Vec<f32>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            clock: FrameClock::new(config.max_dt),
            labels: LabelSync::new(),
            initialized: false,
            frame_counter: 0,
            pending_requests: Vec::new(),
            sound_buffer: Vec::with_capacity(config.max_sounds),
            frame_buffer: vec![0.0; layout.buffer_total_floats],
            layout,
            config,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.frame_buffer = vec![0.0; self.layout.buffer_total_floats];
        self.layout.write_header(&mut self.frame_buffer);
        self.clock = FrameClock::new(self.config.max_dt);
        self.ctx.poses.set_config(self.config.matcher);
        self.game.init(&mut self.ctx);
        self.collect_requests();
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::SessionStarted { mode } => {
                log::info!("XR session started ({:?})", mode);
                self.clock.reset();
            }
            InputEvent::SessionEnded => {
                log::info!("XR session ended");
                self.input.frame_mut().clear();
            }
            _ => {}
        }
        self.input.push(event);
    }

    /// Push an event that names a hand by the host's numeric code.
    pub fn push_hand_input(&mut self, hand: u32, make: impl FnOnce(Handedness) -> InputEvent) {
        match Handedness::from_index(hand) {
            Some(hand) => self.push_input(make(hand)),
            None => log::warn!("ignoring input for unknown hand {}", hand),
        }
    }

    // ---- Tracking snapshot ----

    /// Replace a hand's joints from the host's flat joint array.
    pub fn set_hand_joints(&mut self, hand: u32, joints: &[f32]) {
        let Some(hand) = Handedness::from_index(hand) else {
            log::warn!("joints for unknown hand {}", hand);
            return;
        };
        let skeleton = HandSkeleton::from_flat(joints);
        if skeleton.is_none() {
            log::debug!("{} hand: incomplete joint data ({} floats)", hand.as_str(), joints.len());
        }
        self.input.frame_mut().set_hand(hand, skeleton);
    }

    pub fn clear_hand(&mut self, hand: u32) {
        if let Some(hand) = Handedness::from_index(hand) {
            self.input.frame_mut().set_hand(hand, None);
        }
    }

    pub fn set_viewer_pose(&mut self, pose: [f32; 7]) {
        self.input.frame_mut().viewer = Some(Pose::from_floats(&pose));
    }

    pub fn set_hit_test(&mut self, hand: u32, pose: Option<[f32; 7]>) {
        if let Some(hand) = Handedness::from_index(hand) {
            self.input
                .frame_mut()
                .set_hit_test(hand, pose.map(|p| Pose::from_floats(&p)));
        }
    }

    // ---- Loaders ----

    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => {
                log::info!(
                    "manifest: {} sounds, {} documents",
                    manifest.sounds.len(),
                    manifest.documents.len()
                );
                self.game.on_manifest(&mut self.ctx, &manifest);
                self.collect_requests();
            }
            Err(e) => log::error!("Failed to parse manifest: {}", e),
        }
    }

    pub fn load_poses(&mut self, json: &str) {
        match PoseLibrary::from_json(json) {
            Ok(library) => self.ctx.poses.set_library(library),
            Err(e) => log::error!("Failed to parse pose library: {}", e),
        }
    }

    pub fn load_document(&mut self, key: &str, json: &str) {
        match self.game.on_document(&mut self.ctx, key, json) {
            Ok(()) => log::info!("document '{}' loaded", key),
            Err(e) => log::error!("{}", e),
        }
        self.collect_requests();
    }

    /// Run one frame: classify hands, update the game, build all outputs.
    pub fn tick(&mut self, timestamp_ms: f64) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let dt = self.clock.advance(timestamp_ms);
        self.ctx.dt = dt;
        self.ctx.elapsed = self.clock.elapsed();

        self.ctx.poses.update(self.input.frame(), dt);
        self.game.update(&mut self.ctx, &self.input);

        // Drain input after update
        self.input.drain();
        self.collect_requests();

        if self.ctx.sounds.len() > self.layout.max_sounds {
            log::warn!("{} sounds this frame, keeping {}", self.ctx.sounds.len(), self.layout.max_sounds);
            self.ctx.sounds.truncate(self.layout.max_sounds);
        }
        if self.ctx.events.len() > self.layout.max_events {
            log::warn!("{} events this frame, keeping {}", self.ctx.events.len(), self.layout.max_events);
            self.ctx.events.truncate(self.layout.max_events);
        }

        // Build render buffer from entities
        let dropped = build_render_buffer(
            self.ctx.scene.iter(),
            &mut self.render_buffer,
            self.layout.max_instances,
        );
        if dropped > 0 {
            log::warn!("render buffer full, {} entities not drawn", dropped);
        }

        // Allow game to add custom render commands
        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
            };
            self.game.render(&mut render_ctx);
        }
        self.render_buffer.instances.truncate(self.layout.max_instances);

        self.labels.sync(&self.ctx.scene);

        // Pack sound events into flat buffer
        self.sound_buffer.clear();
        for sound in &self.ctx.sounds {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.frame_counter = self.frame_counter.wrapping_add(1);
        let frame = FrameData {
            frame_counter: self.frame_counter,
            instances: &self.render_buffer.instances,
            sounds: &self.ctx.sounds,
            events: &self.ctx.events,
            hand_tints: self.ctx.hand_tints,
        };
        self.layout.pack(&frame, &mut self.frame_buffer);
    }

    fn collect_requests(&mut self) {
        self.pending_requests.append(&mut self.ctx.requests);
    }

    // ---- Direct access (tests, custom exports) ----

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn frame_buffer_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    /// Hand tint channel (0 = r, 1 = g, 2 = b) for a hand code.
    pub fn hand_tint(&self, hand: u32, channel: usize) -> f32 {
        match Handedness::from_index(hand) {
            Some(hand) if channel < 3 => self.ctx.hand_tints[hand.index()][channel],
            _ => 0.0,
        }
    }

    // ---- JSON accessors ----

    /// Pending asset requests as `[{id, path}]`; clears them.
    pub fn take_asset_requests(&mut self) -> String {
        let json = requests_json(&self.pending_requests);
        self.pending_requests.clear();
        json
    }

    /// Label changes since the last call as `[{id, text}]`.
    pub fn take_label_updates(&mut self) -> String {
        self.labels.take_json()
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

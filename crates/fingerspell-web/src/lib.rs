pub mod runner;

pub use runner::GameRunner;
pub use fingerspell_engine as engine;
pub use js_sys;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, XR input pushes,
///   loaders, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyGame;
///
/// fingerspell_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `fingerspell_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in the initialization log message
///
/// Poses cross the boundary as seven floats: position xyz, quaternion xyzw.
/// Hands are coded 0 = left, 1 = right.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;
        use $crate::engine::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        /// `timestamp_ms` is the XR animation-frame timestamp.
        #[wasm_bindgen]
        pub fn game_tick(timestamp_ms: f64) {
            with_runner(|r| r.tick(timestamp_ms));
        }

        // ---- Session & controller events ----

        /// `mode`: 0 = immersive-ar, 1 = immersive-vr.
        #[wasm_bindgen]
        pub fn game_session_start(mode: u32) {
            match $crate::engine::XrMode::from_code(mode) {
                Some(mode) => with_runner(|r| r.push_input(InputEvent::SessionStarted { mode })),
                None => log::warn!("unknown session mode {}", mode),
            }
        }

        #[wasm_bindgen]
        pub fn game_session_end() {
            with_runner(|r| r.push_input(InputEvent::SessionEnded));
        }

        #[wasm_bindgen]
        pub fn game_controller_connected(hand: u32) {
            with_runner(|r| r.push_hand_input(hand, |hand| InputEvent::ControllerConnected { hand }));
        }

        #[wasm_bindgen]
        pub fn game_controller_disconnected(hand: u32) {
            with_runner(|r| r.push_hand_input(hand, |hand| InputEvent::ControllerDisconnected { hand }));
        }

        #[wasm_bindgen]
        pub fn game_pinch_end(hand: u32) {
            with_runner(|r| r.push_hand_input(hand, |hand| InputEvent::PinchEnd { hand }));
        }

        #[wasm_bindgen]
        pub fn game_squeeze_start(hand: u32) {
            with_runner(|r| r.push_hand_input(hand, |hand| InputEvent::SqueezeStart { hand }));
        }

        #[wasm_bindgen]
        pub fn game_anchor_restored(px: f32, py: f32, pz: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
            let pose = $crate::engine::Pose::from_floats(&[px, py, pz, qx, qy, qz, qw]);
            with_runner(|r| {
                r.push_input(InputEvent::AnchorRestored {
                    position: pose.position,
                    orientation: pose.orientation,
                })
            });
        }

        #[wasm_bindgen]
        pub fn game_planes_detected(count: u32) {
            with_runner(|r| r.push_input(InputEvent::PlanesDetected { count }));
        }

        #[wasm_bindgen]
        pub fn game_asset_loaded(
            request: u32,
            min_x: f32, min_y: f32, min_z: f32,
            max_x: f32, max_y: f32, max_z: f32,
        ) {
            with_runner(|r| {
                r.push_input(InputEvent::AssetLoaded {
                    request: $crate::engine::RequestId(request),
                    min: $crate::engine::glam::Vec3::new(min_x, min_y, min_z),
                    max: $crate::engine::glam::Vec3::new(max_x, max_y, max_z),
                })
            });
        }

        #[wasm_bindgen]
        pub fn game_asset_failed(request: u32) {
            with_runner(|r| {
                r.push_input(InputEvent::AssetFailed {
                    request: $crate::engine::RequestId(request),
                })
            });
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Tracking snapshot ----

        #[wasm_bindgen]
        pub fn game_set_viewer_pose(px: f32, py: f32, pz: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
            with_runner(|r| r.set_viewer_pose([px, py, pz, qx, qy, qz, qw]));
        }

        #[wasm_bindgen]
        pub fn game_set_hit_test(hand: u32, px: f32, py: f32, pz: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
            with_runner(|r| r.set_hit_test(hand, Some([px, py, pz, qx, qy, qz, qw])));
        }

        #[wasm_bindgen]
        pub fn game_clear_hit_test(hand: u32) {
            with_runner(|r| r.set_hit_test(hand, None));
        }

        /// 25 joints × 7 floats, WebXR joint order.
        #[wasm_bindgen]
        pub fn game_set_hand_joints(hand: u32, joints: $crate::js_sys::Float32Array) {
            let data = joints.to_vec();
            with_runner(|r| r.set_hand_joints(hand, &data));
        }

        #[wasm_bindgen]
        pub fn game_clear_hand(hand: u32) {
            with_runner(|r| r.clear_hand(hand));
        }

        // ---- Loaders ----

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) {
            with_runner(|r| r.load_manifest(json));
        }

        #[wasm_bindgen]
        pub fn game_load_poses(json: &str) {
            with_runner(|r| r.load_poses(json));
        }

        #[wasm_bindgen]
        pub fn game_load_document(key: &str, json: &str) {
            with_runner(|r| r.load_document(key, json));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_buffer_ptr() -> *const f32 {
            with_runner(|r| r.frame_buffer_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const u8 {
            with_runner(|r| r.sound_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_hand_tint_r(hand: u32) -> f32 {
            with_runner(|r| r.hand_tint(hand, 0))
        }

        #[wasm_bindgen]
        pub fn get_hand_tint_g(hand: u32) -> f32 {
            with_runner(|r| r.hand_tint(hand, 1))
        }

        #[wasm_bindgen]
        pub fn get_hand_tint_b(hand: u32) -> f32 {
            with_runner(|r| r.hand_tint(hand, 2))
        }

        #[wasm_bindgen]
        pub fn take_asset_requests() -> String {
            with_runner(|r| r.take_asset_requests())
        }

        #[wasm_bindgen]
        pub fn take_label_updates() -> String {
            with_runner(|r| r.take_label_updates())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances())
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(|r| r.max_sounds())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}

use wasm_bindgen::prelude::*;
use fingerspell_engine::XrMode;

mod anchor;
mod charge;
mod config;
mod driver;
mod game;
mod ghost;
mod listener;
mod progress;
mod questions;
mod reference;
mod rig;
mod session;
mod sfx;
mod state;
use game::AslQuiz;
use session::SessionPlan;

fingerspell_web::export_game!(AslQuiz, "asl-quiz");

/// 0 = immersive-ar, 1 = immersive-vr, 2 = no immersive session: open the
/// page on the headset instead.
#[wasm_bindgen]
pub fn session_plan(ar_supported: bool, vr_supported: bool) -> u32 {
    SessionPlan::choose(ar_supported, vr_supported).code()
}

/// Optional features to request for `mode` (0 = AR, 1 = VR).
#[wasm_bindgen]
pub fn session_features(mode: u32) -> js_sys::Array {
    let features = XrMode::from_code(mode).map(session::features).unwrap_or(&[]);
    features.iter().map(|f| JsValue::from_str(f)).collect()
}

/// Headset web-launch link for `page`; empty if `page` cannot be encoded.
#[wasm_bindgen]
pub fn web_launch_url(page: &str) -> String {
    match session::web_launch_url(page) {
        Ok(url) => url.into(),
        Err(e) => {
            log::error!("cannot build launch url for '{}': {}", page, e);
            String::new()
        }
    }
}

// extensions/mod.rs
//
// Optional extension modules.
// These are decoupled from core Entity/Scene — games opt-in by creating these systems.

pub mod easing;
pub mod transform;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec3, ease, ease_vec3};
pub use transform::{Transform, TransformGraph};
pub use tween::{TweenState, Tween, TweenId, TweenTarget, TweenChannel, TweenLoop};

pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod hands;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext, DocumentError};
pub use api::types::{EntityId, SoundEvent, GameEvent, RequestId, AssetRequest};
pub use components::entity::{Entity, EntityKind};
pub use core::scene::Scene;
pub use core::time::FrameClock;
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use input::frame::{Pose, XrFrame};
pub use input::queue::{InputEvent, InputQueue, XrMode};
pub use assets::manifest::{AssetManifest, AssetError};
pub use assets::registry::SoundRegistry;
pub use bridge::labels::LabelSync;
pub use bridge::protocol::{ProtocolLayout, FrameData};
pub use hands::{
    HandJoint, Handedness, HandSkeleton, HandPose, PoseLibrary, PoseLibraryError,
    PoseMatcher, PoseSource, MatcherConfig, JointBinding, JOINT_COUNT, JOINT_FLOATS,
};

// Extensions — decoupled optional systems
pub use extensions::{
    Easing, lerp, lerp_vec3, ease, ease_vec3,
    Transform, TransformGraph,
    TweenState, Tween, TweenId, TweenTarget, TweenChannel, TweenLoop,
};
pub use glam;

use glam::{Quat, Vec3};
use crate::hands::joint::Handedness;
use crate::hands::skeleton::HandSkeleton;

/// A rigid pose in world space (XRRigidTransform).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Build from `[px, py, pz, qx, qy, qz, qw]`. The quaternion is
    /// normalized; a degenerate one falls back to identity.
    pub fn from_floats(v: &[f32; 7]) -> Self {
        let q = Quat::from_xyzw(v[3], v[4], v[5], v[6]);
        let orientation = if q.length_squared() > 1e-8 {
            q.normalize()
        } else {
            Quat::IDENTITY
        };
        Self {
            position: Vec3::new(v[0], v[1], v[2]),
            orientation,
        }
    }

    /// Viewing direction (-Z) of this pose.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-frame tracking state streamed by the host. Unlike `InputEvent`s this
/// is a snapshot: values persist until the host replaces or clears them.
#[derive(Debug, Clone, Default)]
pub struct XrFrame {
    /// Viewer (head) pose.
    pub viewer: Option<Pose>,
    hands: [Option<HandSkeleton>; 2],
    hit_tests: [Option<Pose>; 2],
}

impl XrFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hand(&self, hand: Handedness) -> Option<&HandSkeleton> {
        self.hands[hand.index()].as_ref()
    }

    pub fn set_hand(&mut self, hand: Handedness, skeleton: Option<HandSkeleton>) {
        self.hands[hand.index()] = skeleton;
    }

    /// Latest surface hit under the ray of a controller/hand.
    pub fn hit_test(&self, hand: Handedness) -> Option<Pose> {
        self.hit_tests[hand.index()]
    }

    pub fn set_hit_test(&mut self, hand: Handedness, pose: Option<Pose>) {
        self.hit_tests[hand.index()] = pose;
    }

    /// Forget all tracking (session ended).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

use glam::Vec3;
use crate::input::frame::Pose;
use super::joint::{HandJoint, JOINT_COUNT};

/// Floats per joint in the host's flat joint array: position xyz + quaternion xyzw.
pub const JOINT_FLOATS: usize = 7;

/// One tracked hand: world poses for all 25 joints.
#[derive(Debug, Clone, PartialEq)]
pub struct HandSkeleton {
    joints: [Pose; JOINT_COUNT],
}

impl HandSkeleton {
    pub fn new(joints: [Pose; JOINT_COUNT]) -> Self {
        Self { joints }
    }

    /// Parse the host's flat array (`JOINT_COUNT * JOINT_FLOATS` floats,
    /// joints in WebXR order). Returns None on a short or non-finite array.
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        if data.len() < JOINT_COUNT * JOINT_FLOATS {
            return None;
        }
        if data[..JOINT_COUNT * JOINT_FLOATS].iter().any(|v| !v.is_finite()) {
            return None;
        }
        let mut joints = [Pose::IDENTITY; JOINT_COUNT];
        for (i, chunk) in data.chunks_exact(JOINT_FLOATS).take(JOINT_COUNT).enumerate() {
            let mut floats = [0.0; JOINT_FLOATS];
            floats.copy_from_slice(chunk);
            joints[i] = Pose::from_floats(&floats);
        }
        Some(Self { joints })
    }

    pub fn joint(&self, joint: HandJoint) -> Pose {
        self.joints[joint.index()]
    }

    pub fn wrist(&self) -> Pose {
        self.joint(HandJoint::Wrist)
    }

    /// Joint positions in the wrist's frame, in millimetres — the space the
    /// pose library is recorded in.
    pub fn wrist_relative_mm(&self) -> [Vec3; JOINT_COUNT] {
        let wrist = self.wrist();
        let inv = wrist.orientation.inverse();
        let mut out = [Vec3::ZERO; JOINT_COUNT];
        for (slot, joint) in out.iter_mut().zip(self.joints.iter()) {
            *slot = inv * (joint.position - wrist.position) * 1000.0;
        }
        out
    }
}

use serde::{Deserialize, Serialize};

/// Number of joints in a WebXR hand.
pub const JOINT_COUNT: usize = 25;

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const BOTH: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    pub fn index(self) -> usize {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }

    /// Decode the host's numeric hand id (0 = left, 1 = right).
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Handedness::Left),
            1 => Some(Handedness::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

/// WebXR hand joints, ordered from the wrist outwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandJoint {
    Wrist,
    ThumbMetacarpal,
    ThumbPhalanxProximal,
    ThumbPhalanxDistal,
    ThumbTip,
    IndexFingerMetacarpal,
    IndexFingerPhalanxProximal,
    IndexFingerPhalanxIntermediate,
    IndexFingerPhalanxDistal,
    IndexFingerTip,
    MiddleFingerMetacarpal,
    MiddleFingerPhalanxProximal,
    MiddleFingerPhalanxIntermediate,
    MiddleFingerPhalanxDistal,
    MiddleFingerTip,
    RingFingerMetacarpal,
    RingFingerPhalanxProximal,
    RingFingerPhalanxIntermediate,
    RingFingerPhalanxDistal,
    RingFingerTip,
    PinkyFingerMetacarpal,
    PinkyFingerPhalanxProximal,
    PinkyFingerPhalanxIntermediate,
    PinkyFingerPhalanxDistal,
    PinkyFingerTip,
}

const NAMES: [&str; JOINT_COUNT] = [
    "wrist",
    "thumb-metacarpal",
    "thumb-phalanx-proximal",
    "thumb-phalanx-distal",
    "thumb-tip",
    "index-finger-metacarpal",
    "index-finger-phalanx-proximal",
    "index-finger-phalanx-intermediate",
    "index-finger-phalanx-distal",
    "index-finger-tip",
    "middle-finger-metacarpal",
    "middle-finger-phalanx-proximal",
    "middle-finger-phalanx-intermediate",
    "middle-finger-phalanx-distal",
    "middle-finger-tip",
    "ring-finger-metacarpal",
    "ring-finger-phalanx-proximal",
    "ring-finger-phalanx-intermediate",
    "ring-finger-phalanx-distal",
    "ring-finger-tip",
    "pinky-finger-metacarpal",
    "pinky-finger-phalanx-proximal",
    "pinky-finger-phalanx-intermediate",
    "pinky-finger-phalanx-distal",
    "pinky-finger-tip",
];

impl HandJoint {
    pub const ALL: [HandJoint; JOINT_COUNT] = [
        HandJoint::Wrist,
        HandJoint::ThumbMetacarpal,
        HandJoint::ThumbPhalanxProximal,
        HandJoint::ThumbPhalanxDistal,
        HandJoint::ThumbTip,
        HandJoint::IndexFingerMetacarpal,
        HandJoint::IndexFingerPhalanxProximal,
        HandJoint::IndexFingerPhalanxIntermediate,
        HandJoint::IndexFingerPhalanxDistal,
        HandJoint::IndexFingerTip,
        HandJoint::MiddleFingerMetacarpal,
        HandJoint::MiddleFingerPhalanxProximal,
        HandJoint::MiddleFingerPhalanxIntermediate,
        HandJoint::MiddleFingerPhalanxDistal,
        HandJoint::MiddleFingerTip,
        HandJoint::RingFingerMetacarpal,
        HandJoint::RingFingerPhalanxProximal,
        HandJoint::RingFingerPhalanxIntermediate,
        HandJoint::RingFingerPhalanxDistal,
        HandJoint::RingFingerTip,
        HandJoint::PinkyFingerMetacarpal,
        HandJoint::PinkyFingerPhalanxProximal,
        HandJoint::PinkyFingerPhalanxIntermediate,
        HandJoint::PinkyFingerPhalanxDistal,
        HandJoint::PinkyFingerTip,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// WebXR joint name (also the bone name in the generic-hand models).
    pub fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| Self::ALL[i])
    }

    /// Joints that draw a bone towards this one, as `(from, to)` pairs:
    /// wrist to every metacarpal, then down each finger.
    pub fn bones() -> impl Iterator<Item = (HandJoint, HandJoint)> {
        const FINGER_ROOTS: [usize; 5] = [1, 5, 10, 15, 20];
        const FINGER_LEN: [usize; 5] = [4, 5, 5, 5, 5];

        let spokes = FINGER_ROOTS
            .into_iter()
            .map(|root| (HandJoint::Wrist, HandJoint::ALL[root]));
        let fingers = FINGER_ROOTS.into_iter().zip(FINGER_LEN).flat_map(|(root, len)| {
            (root..root + len - 1).map(|i| (HandJoint::ALL[i], HandJoint::ALL[i + 1]))
        });
        spokes.chain(fingers)
    }
}

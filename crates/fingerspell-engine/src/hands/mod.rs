pub mod joint;
pub mod library;
pub mod matcher;
pub mod registry;
pub mod skeleton;

pub use joint::{HandJoint, Handedness, JOINT_COUNT};
pub use library::{HandPose, PoseLibrary, PoseLibraryError};
pub use matcher::{MatcherConfig, PoseMatcher, PoseSource};
pub use registry::JointBinding;
pub use skeleton::{HandSkeleton, JOINT_FLOATS};

use glam::Vec3;
use serde::Deserialize;
use super::joint::{Handedness, JOINT_COUNT};

/// Errors raised while loading a pose library.
#[derive(thiserror::Error, Debug)]
pub enum PoseLibraryError {
    #[error("pose library is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pose #{index} has no names")]
    Unnamed { index: usize },

    #[error("pose '{name}' has {found} joints, expected 25")]
    JointCount { name: String, found: usize },
}

/// On-disk pose record: wrist-relative joint positions in millimetres.
#[derive(Debug, Deserialize)]
struct PoseRecord {
    names: Vec<String>,
    handedness: Handedness,
    #[serde(rename = "jointPositions")]
    joint_positions: Vec<[f32; 3]>,
}

/// A canonical hand configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    /// Every name this pose answers to ("asl a", "fist", ...).
    pub names: Vec<String>,
    pub handedness: Handedness,
    /// Wrist-relative joint positions, millimetres, WebXR joint order.
    pub joints: [Vec3; JOINT_COUNT],
}

impl HandPose {
    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Primary name.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    /// Euclidean distance over all joints (root of summed squared joint
    /// offsets), in millimetres.
    pub fn distance(&self, joints: &[Vec3; JOINT_COUNT]) -> f32 {
        self.joints
            .iter()
            .zip(joints.iter())
            .map(|(a, b)| a.distance_squared(*b))
            .sum::<f32>()
            .sqrt()
    }
}

/// The set of poses a matcher can recognise.
#[derive(Debug, Clone, Default)]
pub struct PoseLibrary {
    poses: Vec<HandPose>,
}

impl PoseLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of pose records.
    pub fn from_json(json: &str) -> Result<Self, PoseLibraryError> {
        let records: Vec<PoseRecord> = serde_json::from_str(json)?;
        let mut poses = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            if record.names.is_empty() {
                return Err(PoseLibraryError::Unnamed { index });
            }
            if record.joint_positions.len() != JOINT_COUNT {
                return Err(PoseLibraryError::JointCount {
                    name: record.names[0].clone(),
                    found: record.joint_positions.len(),
                });
            }
            let mut joints = [Vec3::ZERO; JOINT_COUNT];
            for (slot, p) in joints.iter_mut().zip(record.joint_positions.iter()) {
                *slot = Vec3::from_array(*p);
            }
            poses.push(HandPose {
                names: record.names,
                handedness: record.handedness,
                joints,
            });
        }

        Ok(Self { poses })
    }

    pub fn push(&mut self, pose: HandPose) {
        self.poses.push(pose);
    }

    /// Index and pose for `name` on the given hand.
    pub fn find(&self, handedness: Handedness, name: &str) -> Option<(usize, &HandPose)> {
        self.poses
            .iter()
            .enumerate()
            .find(|(_, p)| p.handedness == handedness && p.has_name(name))
    }

    /// Every recording of `name` on the given hand, with its library index.
    pub fn poses_named<'a>(
        &'a self,
        handedness: Handedness,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a HandPose)> + 'a {
        self.poses_for(handedness).filter(move |(_, p)| p.has_name(name))
    }

    pub fn get(&self, index: usize) -> Option<&HandPose> {
        self.poses.get(index)
    }

    /// Poses recorded for one hand, with their library index.
    pub fn poses_for(&self, handedness: Handedness) -> impl Iterator<Item = (usize, &HandPose)> {
        self.poses
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.handedness == handedness)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// JSON for a pose whose joints sit on a line, spaced `step` mm along `axis`.
    pub(crate) fn pose_json(names: &[&str], handedness: &str, axis: usize, step: f32) -> String {
        let joints: Vec<String> = (0..JOINT_COUNT)
            .map(|i| {
                let mut p = [0.0f32; 3];
                p[axis] = i as f32 * step;
                format!("[{},{},{}]", p[0], p[1], p[2])
            })
            .collect();
        let names: Vec<String> = names.iter().map(|n| format!("\"{}\"", n)).collect();
        format!(
            r#"{{"names":[{}],"handedness":"{}","jointPositions":[{}]}}"#,
            names.join(","),
            handedness,
            joints.join(",")
        )
    }

    #[test]
    fn parses_and_finds_by_any_name() {
        let json = format!(
            "[{},{}]",
            pose_json(&["asl a", "fist"], "right", 1, 5.0),
            pose_json(&["asl a"], "left", 1, 5.0)
        );
        let lib = PoseLibrary::from_json(&json).unwrap();
        assert_eq!(lib.len(), 2);

        let (idx, pose) = lib.find(Handedness::Right, "fist").unwrap();
        assert_eq!(idx, 0);
        assert_eq!(pose.name(), "asl a");
        assert_eq!(lib.find(Handedness::Left, "asl a").map(|(i, _)| i), Some(1));
        assert!(lib.find(Handedness::Left, "fist").is_none());
        assert_eq!(lib.poses_for(Handedness::Right).count(), 1);
    }

    #[test]
    fn rejects_wrong_joint_count() {
        let json = r#"[{"names":["asl b"],"handedness":"left","jointPositions":[[0,0,0]]}]"#;
        match PoseLibrary::from_json(json) {
            Err(PoseLibraryError::JointCount { name, found }) => {
                assert_eq!(name, "asl b");
                assert_eq!(found, 1);
            }
            other => panic!("expected JointCount, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unnamed_pose() {
        let json = format!("[{}]", pose_json(&[], "left", 0, 1.0));
        assert!(matches!(
            PoseLibrary::from_json(&json),
            Err(PoseLibraryError::Unnamed { index: 0 })
        ));
    }

    #[test]
    fn distance_is_zero_for_identical_joints() {
        let json = format!("[{}]", pose_json(&["asl c"], "right", 2, 3.0));
        let lib = PoseLibrary::from_json(&json).unwrap();
        let pose = lib.get(0).unwrap();
        assert_eq!(pose.distance(&pose.joints), 0.0);

        let mut shifted = pose.joints;
        shifted[24].x += 30.0;
        shifted[23].x += 40.0;
        assert!((pose.distance(&shifted) - 50.0).abs() < 1e-3);
    }
}

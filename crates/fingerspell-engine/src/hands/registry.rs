use super::joint::{HandJoint, JOINT_COUNT};

/// Maps every `HandJoint` to a handle of the caller's choosing (a bone index,
/// an entity id, ...). Built once from a name list; joints the list does not
/// name stay unset and are reported in `missing()`.
#[derive(Debug, Clone, PartialEq)]
pub struct JointBinding<H: Copy> {
    slots: [Option<H>; JOINT_COUNT],
    missing: Vec<HandJoint>,
}

impl<H: Copy> JointBinding<H> {
    /// Resolve `(name, handle)` pairs. Unknown names are ignored with a
    /// warning; duplicate names keep the first handle.
    pub fn bind<'a>(items: impl IntoIterator<Item = (&'a str, H)>) -> Self {
        let mut slots = [None; JOINT_COUNT];
        for (name, handle) in items {
            match HandJoint::from_name(name) {
                Some(joint) => {
                    let slot = &mut slots[joint.index()];
                    if slot.is_none() {
                        *slot = Some(handle);
                    }
                }
                None => log::warn!("unknown hand bone '{}'", name),
            }
        }

        let missing: Vec<HandJoint> = HandJoint::ALL
            .into_iter()
            .filter(|j| slots[j.index()].is_none())
            .collect();
        if !missing.is_empty() {
            log::warn!(
                "hand binding missing {} joints: {:?}",
                missing.len(),
                missing.iter().map(|j| j.name()).collect::<Vec<_>>()
            );
        }

        Self { slots, missing }
    }

    pub fn get(&self, joint: HandJoint) -> Option<H> {
        self.slots[joint.index()]
    }

    pub fn missing(&self) -> &[HandJoint] {
        &self.missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Bound joints with their handles, in joint order.
    pub fn iter(&self) -> impl Iterator<Item = (HandJoint, H)> + '_ {
        HandJoint::ALL
            .into_iter()
            .filter_map(|j| self.slots[j.index()].map(|h| (j, h)))
    }
}

/// Binding of the standard WebXR joint names to their own bone index.
impl JointBinding<u32> {
    pub fn webxr() -> Self {
        Self::bind(HandJoint::ALL.iter().map(|j| (j.name(), j.index() as u32)))
    }

    /// Bind a host bone list: each bone's handle is its position in `names`.
    pub fn from_bone_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::bind(names.iter().enumerate().map(|(i, n)| (n.as_ref(), i as u32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webxr_names_bind_completely() {
        let binding = JointBinding::webxr();
        assert!(binding.is_complete());
        assert_eq!(binding.get(HandJoint::ThumbTip), Some(4));
        assert_eq!(binding.iter().count(), JOINT_COUNT);
    }

    #[test]
    fn missing_bones_are_reported_and_unset() {
        let bones = ["wrist", "thumb-tip", "index-finger-tip", "tail"];
        let binding = JointBinding::from_bone_names(&bones);
        assert!(!binding.is_complete());
        assert_eq!(binding.missing().len(), JOINT_COUNT - 3);
        assert_eq!(binding.get(HandJoint::IndexFingerTip), Some(2));
        assert_eq!(binding.get(HandJoint::MiddleFingerTip), None);
        assert!(binding.missing().contains(&HandJoint::PinkyFingerTip));
    }

    #[test]
    fn duplicate_names_keep_first() {
        let binding = JointBinding::bind([("wrist", 'a'), ("wrist", 'b')]);
        assert_eq!(binding.get(HandJoint::Wrist), Some('a'));
    }
}

use glam::{Quat, Vec3};
use fingerspell_engine::*;
use crate::rig::Rig;

// #95c6eb
const GHOST_COLOR: Vec3 = Vec3::new(0.584, 0.776, 0.922);
const GHOST_OPACITY: f32 = 0.7;
const MARKER_SIZE: f32 = 0.01;
const BONE_THICKNESS: f32 = 0.002;
const MM_TO_M: f32 = 0.001;

/// Translucent joint layout of the target pose, shown next to the model.
///
/// One marker per bound joint plus a thin segment per bone whose two ends
/// are bound. Joints the binding lacks get nothing.
#[derive(Debug)]
pub struct GhostHand {
    root: EntityId,
    handedness: Handedness,
    markers: Vec<(HandJoint, EntityId)>,
    bones: Vec<(HandJoint, HandJoint, EntityId)>,
    pose: Option<String>,
}

impl GhostHand {
    pub fn new(
        rig: &mut Rig,
        ctx: &mut EngineContext,
        anchor: EntityId,
        offset: Vec3,
        handedness: Handedness,
        binding: &JointBinding<u32>,
    ) -> Self {
        let root = rig.spawn(ctx, Some(anchor), |e| e.with_tag("ghost").with_translation(offset));
        let mut ghost = Self {
            root,
            handedness,
            markers: Vec::new(),
            bones: Vec::new(),
            pose: None,
        };
        ghost.build(rig, ctx, binding);
        ghost
    }

    fn build(&mut self, rig: &mut Rig, ctx: &mut EngineContext, binding: &JointBinding<u32>) {
        let root = self.root;
        self.markers = binding
            .iter()
            .map(|(joint, _)| {
                let id = rig.spawn(ctx, Some(root), |e| {
                    e.with_tag(format!("ghost:{}", joint.name()))
                        .with_kind(EntityKind::Marker)
                        .with_scale(Vec3::splat(MARKER_SIZE))
                        .with_tint(GHOST_COLOR)
                        .with_opacity(GHOST_OPACITY)
                        .inactive()
                });
                (joint, id)
            })
            .collect();

        self.bones = HandJoint::bones()
            .filter(|&(from, to)| binding.get(from).is_some() && binding.get(to).is_some())
            .map(|(from, to)| {
                let id = rig.spawn(ctx, Some(root), |e| {
                    e.with_kind(EntityKind::Panel)
                        .with_tint(GHOST_COLOR)
                        .with_opacity(GHOST_OPACITY)
                        .inactive()
                });
                (from, to, id)
            })
            .collect();
    }

    /// Replace the joint binding (host bone list arrived). The new markers
    /// start hidden; `refresh` lays them out again.
    pub fn rebind(&mut self, rig: &mut Rig, ctx: &mut EngineContext, binding: &JointBinding<u32>) {
        for (_, id) in self.markers.drain(..) {
            rig.despawn(ctx, id);
        }
        for (_, _, id) in self.bones.drain(..) {
            rig.despawn(ctx, id);
        }
        self.build(rig, ctx, binding);
    }

    /// Re-show the last pose, if one is showing.
    pub fn refresh(&mut self, scene: &mut Scene, library: &PoseLibrary) {
        if let Some(pose) = self.pose.take() {
            self.show(scene, library, &pose);
        }
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Lay the markers out in `pose_name`. Falls back to the other hand's
    /// recording; hides the ghost when neither exists.
    pub fn show(&mut self, scene: &mut Scene, library: &PoseLibrary, pose_name: &str) -> bool {
        let found = library
            .find(self.handedness, pose_name)
            .or_else(|| {
                Handedness::BOTH
                    .into_iter()
                    .find(|&h| h != self.handedness)
                    .and_then(|other| library.find(other, pose_name))
            })
            .map(|(_, pose)| pose.joints);

        let Some(joints) = found else {
            log::warn!("no recording of '{}' for the ghost hand", pose_name);
            self.hide(scene);
            return false;
        };
        self.pose = Some(pose_name.to_string());

        let at = |joint: HandJoint| joints[joint.index()] * MM_TO_M;
        for &(joint, id) in &self.markers {
            if let Some(entity) = scene.get_mut(id) {
                entity.local.translation = at(joint);
                entity.active = true;
            }
        }
        for &(from, to, id) in &self.bones {
            let (a, b) = (at(from), at(to));
            let Some(entity) = scene.get_mut(id) else { continue };
            let span = b - a;
            let length = span.length();
            if length < 1e-5 {
                entity.active = false;
                continue;
            }
            entity.local.translation = (a + b) * 0.5;
            entity.local.rotation = Quat::from_rotation_arc(Vec3::Y, span / length);
            entity.local.scale = Vec3::new(BONE_THICKNESS, length, BONE_THICKNESS);
            entity.active = true;
        }
        true
    }

    pub fn hide(&mut self, scene: &mut Scene) {
        self.pose = None;
        let ids = self.markers.iter().map(|&(_, id)| id).chain(self.bones.iter().map(|&(_, _, id)| id));
        for id in ids {
            scene.set_active(id, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Library with one right-hand pose, joints 10mm apart along +Y.
    fn library() -> PoseLibrary {
        let mut library = PoseLibrary::new();
        let mut joints = [Vec3::ZERO; JOINT_COUNT];
        for (i, j) in joints.iter_mut().enumerate() {
            *j = Vec3::new(0.0, i as f32 * 10.0, 0.0);
        }
        library.push(HandPose {
            names: vec!["asl a".to_string()],
            handedness: Handedness::Right,
            joints,
        });
        library
    }

    fn setup(binding: &JointBinding<u32>, hand: Handedness) -> (EngineContext, Rig, GhostHand) {
        let mut ctx = EngineContext::new();
        let mut rig = Rig::new();
        let anchor = rig.spawn(&mut ctx, None, |e| e);
        let ghost = GhostHand::new(&mut rig, &mut ctx, anchor, Vec3::ZERO, hand, binding);
        (ctx, rig, ghost)
    }

    #[test]
    fn shows_pose_in_metres() {
        let (mut ctx, _rig, mut ghost) = setup(&JointBinding::webxr(), Handedness::Right);
        assert_eq!(ghost.marker_count(), JOINT_COUNT);
        assert!(ghost.show(&mut ctx.scene, &library(), "asl a"));

        let tip = ctx.scene.find_by_tag("ghost:pinky-finger-tip").unwrap();
        assert!(tip.active);
        assert!((tip.local.translation.y - 0.24).abs() < 1e-6);
        assert_eq!(tip.opacity, GHOST_OPACITY);
    }

    #[test]
    fn falls_back_to_other_hand_then_hides() {
        let (mut ctx, _rig, mut ghost) = setup(&JointBinding::webxr(), Handedness::Left);
        assert!(ghost.show(&mut ctx.scene, &library(), "asl a"));
        assert!(!ghost.show(&mut ctx.scene, &library(), "asl z"));
        assert_eq!(ctx.scene.iter().filter(|e| e.active && e.kind == EntityKind::Marker).count(), 0);
    }

    #[test]
    fn missing_bones_get_no_marker() {
        let binding = JointBinding::from_bone_names(&["wrist", "thumb-metacarpal", "index-finger-tip"]);
        let (mut ctx, mut rig, mut ghost) = setup(&binding, Handedness::Right);
        assert_eq!(ghost.marker_count(), 3);
        assert_eq!(ctx.scene.count_kind(EntityKind::Marker), 3);
        // Only wrist → thumb-metacarpal has both ends bound.
        assert_eq!(ctx.scene.count_kind(EntityKind::Panel), 1);

        ghost.show(&mut ctx.scene, &library(), "asl a");
        ghost.rebind(&mut rig, &mut ctx, &JointBinding::webxr());
        assert!(!ctx.scene.find_by_tag("ghost:ring-finger-tip").unwrap().active);
        ghost.refresh(&mut ctx.scene, &library());
        assert_eq!(ctx.scene.count_kind(EntityKind::Marker), JOINT_COUNT);
        let tip = ctx.scene.find_by_tag("ghost:ring-finger-tip").unwrap();
        assert!(tip.active);
    }
}

use glam::{Quat, Vec3};
use fingerspell_engine::{Handedness, Pose, XrFrame, XrMode};

/// Where the quiz anchor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSource {
    /// Pinch on a hit-test result (or on the hand itself).
    Pinch,
    /// A persistent anchor handed back by the platform.
    Restored,
    /// Fixed spot in front of the viewer (VR has no surfaces).
    ViewerDefault,
}

/// A placement decision; at most one per session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pose: Pose,
    pub source: AnchorSource,
}

/// Rotation about +Y that turns local +Z from `position` towards the viewer,
/// ignoring height. Identity when the viewer is unknown or straight above.
pub fn face_viewer(position: Vec3, viewer: Option<Pose>) -> Quat {
    let Some(viewer) = viewer else {
        return Quat::IDENTITY;
    };
    let dx = viewer.position.x - position.x;
    let dz = viewer.position.z - position.z;
    if dx * dx + dz * dz < 1e-8 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(dx.atan2(dz))
}

/// Decides when and where the single quiz anchor goes.
#[derive(Debug, Default)]
pub struct AnchorPlacer {
    mode: Option<XrMode>,
    placed: bool,
    /// Hands with a live hit-test source.
    hit_targets: [bool; 2],
}

impl AnchorPlacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_started(&mut self, mode: XrMode) {
        *self = Self {
            mode: Some(mode),
            ..Self::default()
        };
    }

    pub fn session_ended(&mut self) {
        *self = Self::default();
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// Forget the placement so the next pinch (or restore) places again.
    /// Returns whether an anchor had been placed.
    pub fn clear(&mut self) -> bool {
        let was_placed = self.placed;
        self.placed = false;
        was_placed
    }

    pub fn controller_connected(&mut self, hand: Handedness) {
        log::debug!("hit-test target for {} hand", hand.as_str());
        self.hit_targets[hand.index()] = true;
    }

    pub fn controller_disconnected(&mut self, hand: Handedness) {
        self.hit_targets[hand.index()] = false;
    }

    fn place(&mut self, pose: Pose, source: AnchorSource) -> Placement {
        self.placed = true;
        log::info!("anchor placed ({:?}) at {:?}", source, pose.position);
        Placement { pose, source }
    }

    /// AR pinch: anchor on the hand's hit-test result, or on its wrist when
    /// nothing is hit. Ignored once an anchor exists.
    pub fn pinch(&mut self, hand: Handedness, frame: &XrFrame) -> Option<Placement> {
        if self.placed || self.mode != Some(XrMode::Ar) {
            return None;
        }
        let hit = if self.hit_targets[hand.index()] {
            frame.hit_test(hand)
        } else {
            None
        };
        let position = match hit {
            Some(hit) => hit.position,
            None => frame.hand(hand)?.wrist().position,
        };
        let orientation = face_viewer(position, frame.viewer);
        Some(self.place(Pose::new(position, orientation), AnchorSource::Pinch))
    }

    /// A persistent anchor came back from the platform. It keeps its stored
    /// orientation.
    pub fn restored(&mut self, pose: Pose) -> Option<Placement> {
        if self.placed || self.mode.is_none() {
            return None;
        }
        Some(self.place(pose, AnchorSource::Restored))
    }

    /// VR: `distance` metres ahead of the viewer along its horizontal
    /// bearing, `drop` metres below eye level. Waits for a viewer pose.
    pub fn vr_default(&mut self, frame: &XrFrame, distance: f32, drop: f32) -> Option<Placement> {
        if self.placed || self.mode != Some(XrMode::Vr) {
            return None;
        }
        let viewer = frame.viewer?;
        let mut forward = viewer.forward();
        forward.y = 0.0;
        let forward = forward.try_normalize().unwrap_or(Vec3::NEG_Z);
        let position = viewer.position + forward * distance - Vec3::Y * drop;
        let orientation = face_viewer(position, Some(viewer));
        Some(self.place(Pose::new(position, orientation), AnchorSource::ViewerDefault))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fingerspell_engine::{HandSkeleton, JOINT_COUNT};

    fn viewer_at(position: Vec3) -> Pose {
        Pose::new(position, Quat::IDENTITY)
    }

    #[test]
    fn repeated_pinches_place_once() {
        let mut placer = AnchorPlacer::new();
        placer.session_started(XrMode::Ar);
        placer.controller_connected(Handedness::Right);

        let mut frame = XrFrame::new();
        frame.set_hit_test(Handedness::Right, Some(Pose::new(Vec3::new(0.0, 0.0, -1.0), Quat::IDENTITY)));

        let mut placements = 0;
        for _ in 0..10 {
            if placer.pinch(Handedness::Right, &frame).is_some() {
                placements += 1;
            }
        }
        assert_eq!(placements, 1);
        assert!(placer.restored(Pose::IDENTITY).is_none());
    }

    #[test]
    fn clearing_allows_a_new_pinch() {
        let mut placer = AnchorPlacer::new();
        placer.session_started(XrMode::Ar);
        placer.controller_connected(Handedness::Right);
        let mut frame = XrFrame::new();
        frame.set_hit_test(Handedness::Right, Some(Pose::IDENTITY));

        assert!(!placer.clear());
        assert!(placer.pinch(Handedness::Right, &frame).is_some());
        assert!(placer.clear());
        assert!(!placer.is_placed());
        let again = placer.pinch(Handedness::Right, &frame).unwrap();
        assert_eq!(again.source, AnchorSource::Pinch);
    }

    #[test]
    fn pinch_without_target_uses_wrist() {
        let mut placer = AnchorPlacer::new();
        placer.session_started(XrMode::Ar);

        let mut frame = XrFrame::new();
        // Hit-test results are ignored without a connected target.
        frame.set_hit_test(Handedness::Left, Some(Pose::new(Vec3::splat(9.0), Quat::IDENTITY)));
        assert!(placer.pinch(Handedness::Left, &frame).is_none());

        let wrist = Pose::new(Vec3::new(0.1, 1.0, -0.3), Quat::IDENTITY);
        frame.set_hand(Handedness::Left, Some(HandSkeleton::new([wrist; JOINT_COUNT])));
        let placement = placer.pinch(Handedness::Left, &frame).unwrap();
        assert_eq!(placement.pose.position, wrist.position);
        assert_eq!(placement.source, AnchorSource::Pinch);
    }

    #[test]
    fn disconnect_drops_hit_target() {
        let mut placer = AnchorPlacer::new();
        placer.session_started(XrMode::Ar);
        placer.controller_connected(Handedness::Right);
        placer.controller_disconnected(Handedness::Right);

        let mut frame = XrFrame::new();
        frame.set_hit_test(Handedness::Right, Some(Pose::IDENTITY));
        assert!(placer.pinch(Handedness::Right, &frame).is_none());
    }

    #[test]
    fn new_session_allows_a_new_anchor() {
        let mut placer = AnchorPlacer::new();
        placer.session_started(XrMode::Ar);
        assert!(placer.restored(Pose::IDENTITY).is_some());
        assert!(placer.is_placed());
        placer.session_started(XrMode::Ar);
        assert!(!placer.is_placed());
        assert!(placer.restored(Pose::IDENTITY).is_some());
    }

    #[test]
    fn vr_anchor_sits_ahead_and_faces_viewer() {
        let mut placer = AnchorPlacer::new();
        placer.session_started(XrMode::Vr);

        let mut frame = XrFrame::new();
        assert!(placer.vr_default(&frame, 1.0, 0.4).is_none());

        frame.viewer = Some(viewer_at(Vec3::new(0.0, 1.6, 0.0)));
        let placement = placer.vr_default(&frame, 1.0, 0.4).unwrap();
        assert!((placement.pose.position - Vec3::new(0.0, 1.2, -1.0)).length() < 1e-5);

        // Local +Z points back at the viewer.
        let facing = placement.pose.orientation * Vec3::Z;
        assert!((facing - Vec3::Z).length() < 1e-5, "{:?}", facing);
        assert!(placer.vr_default(&frame, 1.0, 0.4).is_none());
        // Pinches do nothing in VR.
        assert!(placer.pinch(Handedness::Right, &frame).is_none());
    }

    #[test]
    fn face_viewer_yaws_towards_side() {
        let q = face_viewer(Vec3::ZERO, Some(viewer_at(Vec3::new(2.0, 5.0, 0.0))));
        assert!((q * Vec3::Z - Vec3::X).length() < 1e-5);
        assert_eq!(face_viewer(Vec3::ZERO, None), Quat::IDENTITY);
    }
}
